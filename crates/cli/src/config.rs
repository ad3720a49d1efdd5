use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use warden_core::{PolicyModel, RedisConfig};

use crate::cli::CliArgs;

/// Resolve connection settings: environment for the chosen profile, then
/// command-line overrides on top.
pub fn resolve(args: &CliArgs) -> RedisConfig {
    let mut config = RedisConfig::for_profile(&args.profile);
    if let Some(ref key) = args.key {
        config.key = key.clone();
    }
    if let Some(ref host) = args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(db) = args.db {
        config.db = db;
    }
    config
}

/// Parse a policy file into a model, one `ptype, v0, v1, ...` rule per line.
pub fn read_policy_file(path: &Path) -> Result<PolicyModel> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read policy file {}", path.display()))?;

    let mut model = PolicyModel::new();
    for (lineno, line) in text.lines().enumerate() {
        model
            .load_policy_line(line)
            .with_context(|| format!("{}:{}: invalid rule", path.display(), lineno + 1))?;
    }
    debug!(path = %path.display(), rules = model.len(), "parsed policy file");
    Ok(model)
}
