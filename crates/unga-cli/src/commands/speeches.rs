//! Speech ingestion and retrieval commands.

use super::FilterArgs;
use crate::render::{self, display_or_empty};
use crate::Context;
use clap::Args;
use console::style;
use std::path::{Path, PathBuf};
use unga_storage::{Ingestor, NewSpeech};

/// Add command arguments.
#[derive(Args)]
pub struct AddArgs {
    /// ISO3 country code
    #[arg(long)]
    pub code: String,

    /// General Assembly session
    #[arg(long)]
    pub session: i64,

    #[arg(long)]
    pub year: i64,

    /// Text file holding the speech
    pub file: PathBuf,
}

/// Search command arguments.
#[derive(Args)]
pub struct SearchArgs {
    /// Substring of the speech text
    pub text: Option<String>,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Maximum results (defaults to the configured limit)
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Semantic search arguments.
#[derive(Args)]
pub struct SemanticArgs {
    /// Query text
    pub query: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Minimum similarity in [-1, 1]
    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f32>,
}

/// Similar-speeches arguments.
#[derive(Args)]
pub struct SimilarArgs {
    /// Speech id
    pub id: i64,

    #[arg(short, long)]
    pub limit: Option<usize>,

    #[arg(short, long, allow_negative_numbers = true)]
    pub threshold: Option<f32>,
}

/// Ingest a file or every speech file in a directory.
pub fn ingest(ctx: &Context, path: &Path) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let ingestor = Ingestor::new(&store);

    if path.is_dir() {
        let stats = ingestor.ingest_directory(path)?;
        if ctx.json {
            return render::print_json(&stats);
        }
        println!(
            "{} {} ingested, {} failed, {} skipped ({} files)",
            style("Done:").green().bold(),
            stats.successful,
            stats.failed,
            stats.skipped,
            stats.total_files
        );
    } else {
        let id = ingestor.ingest_file(path)?;
        if ctx.json {
            return render::print_json(&serde_json::json!({ "id": id }));
        }
        println!("{} speech #{}", style("Ingested").green().bold(), id);
    }
    Ok(())
}

/// Add one speech from flags and a text file.
pub fn add(ctx: &Context, args: AddArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.file)?;
    let mut speech = NewSpeech::from_code(&args.code, args.session, args.year, text.trim());
    if let Some(name) = args.file.file_name().and_then(|n| n.to_str()) {
        speech = speech.with_source(name);
    }

    let store = ctx.open_store()?;
    let id = store.save_speech(&speech)?;
    if ctx.json {
        return render::print_json(&serde_json::json!({ "id": id }));
    }
    println!(
        "{} speech #{} for {} ({}), {} words",
        style("Saved").green().bold(),
        id,
        speech.country_name,
        speech.year,
        speech.word_count()
    );
    Ok(())
}

pub fn search(ctx: &Context, args: SearchArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let mut filter = args.filters.to_filter();
    filter.text = args.text;
    let limit = args.limit.unwrap_or(ctx.config.search.default_limit);

    let speeches = display_or_empty("search_speeches", store.search_speeches(&filter, limit));
    if ctx.json {
        return render::print_json(&speeches);
    }
    render::render_speeches(&speeches);
    Ok(())
}

pub fn semantic(ctx: &Context, args: SemanticArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    if !store.embeddings().is_semantic() {
        eprintln!(
            "{} embeddings are not semantic; falling back to text search",
            style("Note:").yellow()
        );
    }
    let limit = args.limit.unwrap_or(ctx.config.search.default_limit);
    let threshold = args.threshold.unwrap_or(ctx.config.search.similarity_threshold);

    let hits = display_or_empty(
        "semantic_search",
        store.semantic_search(&args.query, &args.filters.to_filter(), limit, threshold),
    );
    if ctx.json {
        return render::print_json(&hits);
    }
    render::render_hits(&hits);
    Ok(())
}

pub fn similar(ctx: &Context, args: SimilarArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let limit = args.limit.unwrap_or(ctx.config.search.default_limit);
    let threshold = args.threshold.unwrap_or(ctx.config.search.similar_threshold);

    let hits = display_or_empty(
        "find_similar_speeches",
        store.find_similar_speeches(args.id, limit, threshold),
    );
    if ctx.json {
        return render::print_json(&hits);
    }
    render::render_hits(&hits);
    Ok(())
}

pub fn regions(ctx: &Context, year: i64) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let regions = display_or_empty("countries_by_region", store.countries_by_region(year));
    if ctx.json {
        return render::print_json(&regions);
    }
    render::render_regions(year, &regions);
    Ok(())
}
