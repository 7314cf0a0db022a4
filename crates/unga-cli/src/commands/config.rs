//! Configuration management commands.

use crate::Context;
use clap::Args;
use std::path::{Path, PathBuf};
use unga_core::config::Config;
use unga_core::paths;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file plus environment)
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Walk a dot-separated key through the serialized configuration.
pub fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').fold(Some(json), |acc, k| acc.and_then(|v| v.get(k)))
}

fn config_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(paths::config_file()?),
    }
}

/// Run the config command.
pub fn run(ctx: &Context, explicit: Option<&Path>, args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let mut shown = ctx.config.clone();
            if shown.embeddings.api_key.is_some() {
                shown.embeddings.api_key = Some("********".to_string());
            }
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }

        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(&ctx.config)?;
            match lookup(&json, &key) {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Init { force } => {
            let path = config_path(explicit)?;

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {:?}. Use --force to overwrite.",
                    path
                );
            }

            paths::ensure_dirs()?;
            Config::default().save(&path)?;

            println!("Created config file: {:?}", path);
            println!("  Tip: Run 'unga init' to create the database.");
        }

        ConfigCommand::Path => {
            println!("{}", config_path(explicit)?.display());
        }

        ConfigCommand::Validate => {
            let path = config_path(explicit)?;
            match Config::load(&path) {
                Ok(config) => match config.with_env_overrides().validate() {
                    Ok(_) => println!("Configuration is valid"),
                    Err(e) => anyhow::bail!("Configuration error: {}", e),
                },
                Err(e) => anyhow::bail!("Failed to load config: {}", e),
            }
        }
    }

    Ok(())
}
