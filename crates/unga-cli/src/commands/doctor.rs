//! Diagnostic commands.

use crate::Context;
use console::{style, Emoji};
use unga_core::config::{Config, EmbeddingsProvider};
use unga_core::{env, paths, ConfigError};

static CHECK: Emoji = Emoji("✓", "+");
static CROSS: Emoji = Emoji("✗", "x");
static WARN: Emoji = Emoji("⚠", "!");

/// Run the doctor command.
pub fn run(ctx: &Context) -> anyhow::Result<()> {
    println!("unga doctor\n");

    let mut errors = 0;
    let mut warnings = 0;

    println!("Checking directories...");
    match paths::base_dir() {
        Ok(dir) if dir.exists() => {
            println!("  {} Base directory exists: {:?}", style(CHECK).green(), dir);
        }
        Ok(dir) => {
            println!("  {} Base directory missing: {:?}", style(WARN).yellow(), dir);
            println!("    Run 'unga init' to create it");
            warnings += 1;
        }
        Err(e) => {
            println!("  {} Failed to determine base directory: {}", style(CROSS).red(), e);
            errors += 1;
        }
    }

    println!("\nChecking configuration...");
    match Config::load_default() {
        Ok(_) => println!("  {} Configuration file loaded", style(CHECK).green()),
        Err(ConfigError::NotFound(_)) => {
            println!("  {} Configuration file not found, using defaults", style(WARN).yellow());
            warnings += 1;
        }
        Err(e) => {
            println!("  {} Configuration error: {}", style(CROSS).red(), e);
            errors += 1;
        }
    }
    match ctx.config.validate() {
        Ok(_) => println!("  {} Effective configuration valid", style(CHECK).green()),
        Err(e) => {
            println!("  {} Effective configuration invalid: {}", style(CROSS).red(), e);
            errors += 1;
        }
    }

    println!("\nChecking embeddings...");
    if ctx.config.embeddings.provider == EmbeddingsProvider::Openai {
        if ctx.config.embeddings.api_key.is_some() || env::get_var(env::vars::OPENAI_API_KEY).is_some()
        {
            println!("  {} OPENAI_API_KEY is set", style(CHECK).green());
        } else {
            println!("  {} OPENAI_API_KEY is not set", style(WARN).yellow());
            warnings += 1;
        }
    }

    println!("\nChecking database...");
    match ctx.open_store() {
        Ok(store) => {
            if let Some(path) = store.path() {
                println!("  {} Database opened: {}", style(CHECK).green(), path.display());
            }
            if store.embeddings().is_semantic() {
                println!(
                    "  {} Semantic embeddings: {}",
                    style(CHECK).green(),
                    store.embeddings().name()
                );
            } else {
                println!(
                    "  {} Hash embeddings only; semantic search falls back to text search",
                    style(WARN).yellow()
                );
                warnings += 1;
            }
            match store.get_statistics() {
                Ok(stats) => println!(
                    "  {} {} speeches, {} analyses",
                    style(CHECK).green(),
                    stats.total_speeches,
                    stats.total_analyses
                ),
                Err(e) => {
                    println!("  {} Statistics query failed: {}", style(CROSS).red(), e);
                    errors += 1;
                }
            }
        }
        Err(e) => {
            println!("  {} Failed to open database: {}", style(CROSS).red(), e);
            errors += 1;
        }
    }

    println!();
    if errors > 0 {
        println!("{} {} error(s), {} warning(s)", style(CROSS).red(), errors, warnings);
        anyhow::bail!("doctor found {} error(s)", errors);
    } else if warnings > 0 {
        println!("{} {} warning(s)", style(WARN).yellow(), warnings);
    } else {
        println!("{} All checks passed", style(CHECK).green());
    }
    Ok(())
}
