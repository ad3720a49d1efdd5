mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use warden_core::config::load_dotenv;
use warden_storage::{PolicyAdapter, RuleStore};

use crate::cli::{CliArgs, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();
    let config = config::resolve(&args);
    config.log_summary();

    let store = RuleStore::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}", config.connection_url()))?;

    match args.command {
        Command::List => {
            for rule in store.load_all().await? {
                println!("{}", rule);
            }
        }
        Command::Add { ptype, values } => {
            store.append(&ptype, &values[..]).await?;
            println!("added 1 rule");
        }
        Command::Remove {
            ptype,
            values,
            first,
        } => {
            let removed = store.remove_exact(&ptype, &values[..], !first).await?;
            println!("removed {} rule(s)", removed);
        }
        Command::RemoveFiltered {
            ptype,
            field_index,
            values,
        } => {
            let removed = store.remove_filtered(&ptype, field_index, &values[..]).await?;
            println!("removed {} rule(s)", removed);
        }
        Command::Import { file, append } => {
            let model = config::read_policy_file(&file)?;
            if append {
                for (_, ptype, values) in model.iter() {
                    store.append(ptype, values).await?;
                }
            } else {
                store.save_policy(&model).await?;
            }
            info!(file = %file.display(), rules = model.len(), append, "imported policy file");
            println!("imported {} rule(s)", model.len());
        }
        Command::Clear => {
            store.clear_policy().await?;
            println!("cleared {}", store.key());
        }
        Command::Ping => {
            store.ping().await?;
            println!("ok: {} holds {} rule(s)", store.key(), store.len().await?);
        }
    }

    Ok(())
}
