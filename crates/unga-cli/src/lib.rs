//! UNGA speech store command-line interface.

pub mod commands;
pub mod render;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use unga_core::{Config, ConfigError};
use unga_storage::SpeechStore;

/// unga - store and search UN General Assembly speeches
#[derive(Parser)]
#[command(name = "unga")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(long, env = "UNGA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create the data directory, config file, and database
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Ingest a speech file or a directory of `{ISO3}_{session}_{year}.txt` files
    Ingest {
        /// File or directory
        path: PathBuf,
    },

    /// Add one speech from a text file
    Add(commands::speeches::AddArgs),

    /// Filtered text search
    Search(commands::speeches::SearchArgs),

    /// Similarity-ranked search
    Semantic(commands::speeches::SemanticArgs),

    /// Speeches similar to a stored speech
    Similar(commands::speeches::SimilarArgs),

    /// Speeches of one year grouped by region
    Regions {
        /// Year to list
        year: i64,
    },

    /// Dataset statistics
    Stats,

    /// Per-year speech volume
    Trends(commands::stats::TrendsArgs),

    /// Manage stored analyses
    Analyses(commands::analyses::AnalysesArgs),

    /// Detect SDG references and Africa mentions in a text file
    Sdgs {
        /// Text file to scan
        file: PathBuf,
    },

    /// Classify a country or entity
    Classify {
        /// Country or entity name
        name: String,
    },

    /// Import speeches and analyses from a legacy database
    ImportLegacy {
        /// Legacy SQLite database
        path: PathBuf,
    },

    /// Delete every speech and analysis
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Run diagnostics
    Doctor,

    /// Show version information
    Version,
}

/// Shared state for command handlers.
pub struct Context {
    pub config: Config,
    pub json: bool,
}

impl Context {
    /// Open the configured database.
    pub fn open_store(&self) -> anyhow::Result<SpeechStore> {
        Ok(SpeechStore::from_config(&self.config)?)
    }
}

/// Load configuration from `path` (or the default location), then apply env overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::load_or_default());
    };
    match Config::load(path) {
        Ok(config) => Ok(config.with_env_overrides()),
        Err(ConfigError::NotFound(_)) => Ok(Config::default().with_env_overrides()),
        Err(e) => Err(e.into()),
    }
}

/// Run the CLI with the given arguments.
pub fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let ctx = Context {
        config,
        json: cli.json,
    };

    match cli.command {
        Commands::Init { force } => commands::admin::init(&ctx, cli.config.as_deref(), force),
        Commands::Ingest { path } => commands::speeches::ingest(&ctx, &path),
        Commands::Add(args) => commands::speeches::add(&ctx, args),
        Commands::Search(args) => commands::speeches::search(&ctx, args),
        Commands::Semantic(args) => commands::speeches::semantic(&ctx, args),
        Commands::Similar(args) => commands::speeches::similar(&ctx, args),
        Commands::Regions { year } => commands::speeches::regions(&ctx, year),
        Commands::Stats => commands::stats::stats(&ctx),
        Commands::Trends(args) => commands::stats::trends(&ctx, args),
        Commands::Analyses(args) => commands::analyses::run(&ctx, args),
        Commands::Sdgs { file } => commands::reference::sdgs(&ctx, &file),
        Commands::Classify { name } => commands::reference::classify(&ctx, &name),
        Commands::ImportLegacy { path } => commands::admin::import_legacy(&ctx, &path),
        Commands::Reset { yes } => commands::admin::reset(&ctx, yes),
        Commands::Config(args) => commands::config::run(&ctx, cli.config.as_deref(), args),
        Commands::Doctor => commands::doctor::run(&ctx),
        Commands::Version => {
            println!("unga {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_version() {
        let cli = Cli::try_parse_from(["unga", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_parse_search_filters() {
        let cli = Cli::try_parse_from([
            "unga", "search", "climate", "-c", "KEN", "-c", "Ghana", "-y", "2020", "--limit", "5",
        ])
        .unwrap();
        match cli.command {
            Commands::Search(args) => {
                assert_eq!(args.text.as_deref(), Some("climate"));
                assert_eq!(args.filters.country, vec!["KEN", "Ghana"]);
                assert_eq!(args.filters.year, vec![2020]);
                assert_eq!(args.limit, Some(5));
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_parse_year_range() {
        let cli = Cli::try_parse_from(["unga", "trends", "--from", "1990", "--to", "2024"]).unwrap();
        match cli.command {
            Commands::Trends(args) => {
                assert_eq!(args.years().len(), 35);
            }
            _ => panic!("Expected Trends command"),
        }
    }

    #[test]
    fn test_parse_semantic_threshold() {
        let cli = Cli::try_parse_from(["unga", "semantic", "peace", "--threshold", "0.5"]).unwrap();
        match cli.command {
            Commands::Semantic(args) => {
                assert_eq!(args.query, "peace");
                assert_eq!(args.threshold, Some(0.5));
            }
            _ => panic!("Expected Semantic command"),
        }
    }

    #[test]
    fn test_parse_analyses_list() {
        let cli = Cli::try_parse_from([
            "unga",
            "analyses",
            "list",
            "--classification",
            "african",
            "--africa-mentioned",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyses(args) => match args.command {
                commands::analyses::AnalysesCommand::List {
                    classification,
                    africa_mentioned,
                    ..
                } => {
                    assert_eq!(
                        classification,
                        Some(commands::analyses::ClassificationArg::African)
                    );
                    assert!(africa_mentioned);
                }
                _ => panic!("Expected Analyses List command"),
            },
            _ => panic!("Expected Analyses command"),
        }
    }

    #[test]
    fn test_parse_reset_requires_flag_value() {
        let cli = Cli::try_parse_from(["unga", "reset"]).unwrap();
        assert!(matches!(cli.command, Commands::Reset { yes: false }));
    }

    #[test]
    fn test_parse_global_json() {
        let cli = Cli::try_parse_from(["unga", "stats", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn test_load_config_missing_file_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.json5"))).unwrap();
        assert_eq!(config.search.default_limit, 10);
    }
}
