//! Reference-data lookups that need no database.

use crate::render;
use crate::Context;
use console::style;
use std::path::Path;
use unga_core::reference;

pub fn sdgs(ctx: &Context, file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)?;
    let sdgs = reference::extract_sdgs(&text);
    let africa = reference::detect_africa_mention(&text);

    if ctx.json {
        return render::print_json(&serde_json::json!({
            "sdgs": sdgs,
            "africa_mentioned": africa,
        }));
    }

    if sdgs.is_empty() {
        println!("{}", style("No SDGs mentioned").yellow());
    }
    for n in &sdgs {
        println!(
            "  {} {}",
            style(format!("SDG {:>2}", n)).cyan(),
            reference::sdg_description(*n).unwrap_or_default()
        );
    }
    println!("Africa mentioned: {}", if africa { "yes" } else { "no" });
    Ok(())
}

pub fn classify(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let canonical = reference::normalize_country_name(name);
    let classification = reference::infer_classification(name);

    if ctx.json {
        return render::print_json(&serde_json::json!({
            "name": canonical,
            "classification": classification,
        }));
    }
    println!("{}: {}", style(canonical).bold(), classification);
    Ok(())
}
