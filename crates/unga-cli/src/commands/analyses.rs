//! Analysis management commands.

use crate::render::{self, display_or_empty};
use crate::Context;
use clap::{Args, Subcommand, ValueEnum};
use console::style;
use std::path::PathBuf;
use unga_core::Classification;
use unga_storage::{AnalysisFilter, NewAnalysis};

/// Analyses command arguments.
#[derive(Args)]
pub struct AnalysesArgs {
    #[command(subcommand)]
    pub command: AnalysesCommand,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ClassificationArg {
    /// African Member State
    African,
    /// Development Partner
    Partner,
}

impl From<ClassificationArg> for Classification {
    fn from(arg: ClassificationArg) -> Self {
        match arg {
            ClassificationArg::African => Classification::AfricanMemberState,
            ClassificationArg::Partner => Classification::DevelopmentPartner,
        }
    }
}

#[derive(Subcommand)]
pub enum AnalysesCommand {
    /// List analyses, newest first
    List {
        /// Country name substring
        #[arg(long)]
        country: Option<String>,

        #[arg(long, value_enum)]
        classification: Option<ClassificationArg>,

        /// Only analyses that mention Africa
        #[arg(long)]
        africa_mentioned: bool,

        /// Text in the country, input, or output
        #[arg(long)]
        search: Option<String>,

        #[arg(short, long, default_value_t = 50)]
        limit: usize,

        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Show one analysis
    Show {
        id: i64,
    },

    /// Delete one analysis
    Delete {
        id: i64,
    },

    /// Store an analysis produced elsewhere
    Add {
        /// Country or entity
        #[arg(long)]
        country: String,

        /// Speech text that was analysed
        #[arg(long)]
        raw: PathBuf,

        /// Generated markdown
        #[arg(long)]
        output: PathBuf,

        /// Prompt sent to the model
        #[arg(long, default_value = "")]
        prompt: String,

        /// Date of the speech
        #[arg(long)]
        date: Option<String>,
    },
}

/// Run the analyses command.
pub fn run(ctx: &Context, args: AnalysesArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;

    match args.command {
        AnalysesCommand::List {
            country,
            classification,
            africa_mentioned,
            search,
            limit,
            offset,
        } => {
            let filter = AnalysisFilter {
                country,
                classification: classification.map(Into::into),
                africa_mentioned: africa_mentioned.then_some(true),
                search_text: search,
            };
            let analyses = display_or_empty(
                "list_analyses",
                store.list_analyses(&filter, limit, offset),
            );
            if ctx.json {
                return render::print_json(&analyses);
            }
            render::render_analyses(&analyses);
        }

        AnalysesCommand::Show { id } => match store.get_analysis(id)? {
            Some(analysis) if ctx.json => render::print_json(&analysis)?,
            Some(analysis) => render::render_analysis(&analysis),
            None => anyhow::bail!("Analysis not found: {}", id),
        },

        AnalysesCommand::Delete { id } => {
            if !store.delete_analysis(id)? {
                anyhow::bail!("Analysis not found: {}", id);
            }
            println!("{} analysis #{}", style("Deleted").green().bold(), id);
        }

        AnalysesCommand::Add {
            country,
            raw,
            output,
            prompt,
            date,
        } => {
            let raw_text = std::fs::read_to_string(&raw)?;
            let output_markdown = std::fs::read_to_string(&output)?;
            let mut analysis = NewAnalysis::derive(country, raw_text, prompt, output_markdown);
            analysis.speech_date = date;
            analysis.source_filename = raw.file_name().and_then(|n| n.to_str()).map(String::from);

            let id = store.save_analysis(&analysis)?;
            if ctx.json {
                return render::print_json(&serde_json::json!({ "id": id }));
            }
            println!(
                "{} analysis #{} ({}, {})",
                style("Saved").green().bold(),
                id,
                analysis.classification,
                unga_core::reference::format_sdgs(&analysis.sdgs)
            );
        }
    }

    Ok(())
}
