//! Setup and maintenance commands.

use crate::render;
use crate::Context;
use console::style;
use std::path::Path;
use unga_core::paths;

/// Create directories, write a config file if needed, and create the schema.
pub fn init(ctx: &Context, config_path: Option<&Path>, force: bool) -> anyhow::Result<()> {
    paths::ensure_dirs()?;

    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => paths::config_file()?,
    };
    if path.exists() && !force {
        println!("Config file exists: {}", path.display());
    } else {
        let mut config = ctx.config.clone();
        // Keys stay in the environment.
        config.embeddings.api_key = None;
        config.save(&path)?;
        println!("{} {}", style("Created config file:").green(), path.display());
    }

    let store = ctx.open_store()?;
    if let Some(db) = store.path() {
        println!("{} {}", style("Database ready:").green(), db.display());
    }
    println!("Embeddings: {}", store.embeddings().name());
    Ok(())
}

pub fn import_legacy(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = store.import_legacy(path)?;
    if ctx.json {
        return render::print_json(&stats);
    }
    println!(
        "{} {} speeches ({} failed), {} analyses ({} failed)",
        style("Imported").green().bold(),
        stats.speeches_imported,
        stats.speeches_failed,
        stats.analyses_imported,
        stats.analyses_failed
    );
    Ok(())
}

pub fn reset(ctx: &Context, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!("Refusing to delete all speeches and analyses without --yes");
    }
    let store = ctx.open_store()?;
    store.reset()?;
    println!("{}", style("Database reset").green().bold());
    Ok(())
}
