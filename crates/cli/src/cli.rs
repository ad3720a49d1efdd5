use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Manage authorization policy rules stored in Redis.
///
/// Connection settings come from the environment (`REDIS_HOST`,
/// `REDIS_PORT`, `REDIS_PASSWORD`, ...) and can be overridden per call.
#[derive(Parser, Debug)]
#[command(name = "warden", version, about = "Manage policy rules stored in Redis")]
pub struct CliArgs {
    /// Config profile; env keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, env = "WARDEN_PROFILE", default_value = "")]
    pub profile: String,

    /// List key holding the rules (overrides WARDEN_KEY)
    #[arg(long)]
    pub key: Option<String>,

    /// Redis host (overrides REDIS_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Redis port (overrides REDIS_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Redis logical database (overrides REDIS_DB)
    #[arg(long)]
    pub db: Option<i64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every stored rule, one per line
    List,

    /// Append a rule
    Add {
        /// Policy type, e.g. p, g, g2
        ptype: String,
        /// Rule values in field order (at most six)
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Remove rules identical to the given one
    Remove {
        ptype: String,
        #[arg(required = true)]
        values: Vec<String>,
        /// Only remove the first occurrence
        #[arg(long)]
        first: bool,
    },

    /// Remove every rule whose fields match, starting at FIELD_INDEX.
    /// An empty value ("") matches any field.
    RemoveFiltered {
        ptype: String,
        field_index: usize,
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },

    /// Load rules from a policy file (`ptype, v0, v1, ...` per line)
    Import {
        file: PathBuf,
        /// Append to the stored rules instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Delete the whole rule collection
    Clear,

    /// Check connectivity and print the collection size
    Ping,
}
