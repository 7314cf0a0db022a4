//! Terminal rendering utilities.
//!
//! Provides result listings, statistics tables, and the display-boundary
//! error adapter.

use console::style;
use serde::Serialize;
use std::collections::BTreeMap;
use unga_storage::{AnalysisRecord, CountryEntry, SpeechHit, SpeechRecord, Statistics, YearTrend};

/// Collapse a failed query into an empty value for display.
///
/// The error is logged; the caller renders an empty listing instead of aborting.
pub fn display_or_empty<T: Default>(operation: &str, result: unga_storage::Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(operation, error = %e, "Query failed, showing no results");
            T::default()
        }
    }
}

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First `max` characters, with an ellipsis when cut.
pub fn excerpt(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

fn speech_header(speech: &SpeechRecord) -> String {
    format!(
        "{} {} ({}) {} session {}, {} words",
        style(format!("#{}", speech.id)).dim(),
        style(&speech.country_name).bold(),
        speech.country_code,
        speech.year,
        speech.session,
        speech.word_count,
    )
}

/// Render a plain speech listing.
pub fn render_speeches(speeches: &[SpeechRecord]) {
    if speeches.is_empty() {
        println!("{}", style("No speeches found").yellow());
        return;
    }
    for speech in speeches {
        println!("{}", speech_header(speech));
        println!("    {}", style(excerpt(&speech.speech_text, 160)).dim());
    }
    println!("\n{} result(s)", speeches.len());
}

/// Render a similarity-ranked listing.
pub fn render_hits(hits: &[SpeechHit]) {
    if hits.is_empty() {
        println!("{}", style("No matching speeches").yellow());
        return;
    }
    for hit in hits {
        println!(
            "{} {}",
            style(format!("{:.3}", hit.similarity)).cyan(),
            speech_header(&hit.speech)
        );
        println!("    {}", style(excerpt(&hit.speech.speech_text, 160)).dim());
    }
    println!("\n{} result(s)", hits.len());
}

/// Render countries grouped by region.
pub fn render_regions(year: i64, regions: &BTreeMap<String, Vec<CountryEntry>>) {
    if regions.is_empty() {
        println!("{}", style(format!("No speeches for {}", year)).yellow());
        return;
    }
    for (region, entries) in regions {
        println!("{} ({})", style(region).bold(), entries.len());
        for entry in entries {
            let marker = if entry.is_african_member { " [AU]" } else { "" };
            println!(
                "  {:<4} {}{} - {} words",
                entry.country_code, entry.country_name, marker, entry.word_count
            );
        }
    }
}

/// Render dataset statistics.
pub fn render_statistics(stats: &Statistics) {
    println!("{}", style("Speeches").bold());
    println!("  total:     {}", style(stats.total_speeches).cyan());
    println!("  countries: {}", style(stats.countries).cyan());
    println!("  years:     {}", style(stats.years).cyan());
    println!("{}", style("Analyses").bold());
    println!("  total:     {}", style(stats.total_analyses).cyan());
    for (classification, count) in &stats.analyses_by_classification {
        println!("  {:<22} {}", classification, count);
    }

    if !stats.speeches_by_region.is_empty() {
        println!("\n{}", style("By region").bold());
        for (region, count) in &stats.speeches_by_region {
            println!("  {:<22} {}", region, count);
        }
    }
    if !stats.speeches_by_year.is_empty() {
        println!("\n{}", style("By year").bold());
        for (year, count) in stats.speeches_by_year.iter().rev() {
            println!("  {:<6} {}", year, count);
        }
    }
}

/// Render per-year trends.
pub fn render_trends(trends: &[YearTrend]) {
    if trends.is_empty() {
        println!("{}", style("No speeches match").yellow());
        return;
    }
    println!("{:<6} {:>8} {:>10} {:>10}", "year", "speeches", "words", "countries");
    for trend in trends {
        println!(
            "{:<6} {:>8} {:>10} {:>10}",
            trend.year, trend.speeches, trend.total_words, trend.countries
        );
    }
}

/// Render an analysis listing.
pub fn render_analyses(analyses: &[AnalysisRecord]) {
    if analyses.is_empty() {
        println!("{}", style("No analyses found").yellow());
        return;
    }
    for analysis in analyses {
        let africa = if analysis.africa_mentioned { "yes" } else { "no" };
        println!(
            "{} {} - {} - {} - Africa: {}",
            style(format!("#{}", analysis.id)).dim(),
            style(&analysis.country).bold(),
            analysis.classification,
            analysis.created_at.format("%Y-%m-%d %H:%M"),
            africa,
        );
    }
}

/// Render one analysis in full.
pub fn render_analysis(analysis: &AnalysisRecord) {
    println!("{} {}", style(format!("#{}", analysis.id)).dim(), style(&analysis.country).bold());
    println!("Classification: {}", analysis.classification);
    if let Some(date) = &analysis.speech_date {
        println!("Speech date:    {}", date);
    }
    if let Some(source) = &analysis.source_filename {
        println!("Source:         {}", source);
    }
    println!("SDGs:           {}", unga_core::reference::format_sdgs(&analysis.sdgs));
    println!("Africa:         {}", if analysis.africa_mentioned { "mentioned" } else { "not mentioned" });
    println!("Created:        {}", analysis.created_at.to_rfc3339());
    println!();
    println!("{}", analysis.output_markdown);
}
