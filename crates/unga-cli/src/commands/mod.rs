//! CLI command implementations.

pub mod admin;
pub mod analyses;
pub mod config;
pub mod doctor;
pub mod reference;
pub mod speeches;
pub mod stats;

use clap::Args;
use unga_storage::SpeechFilter;

/// Filters shared by the search commands.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Country code or name (repeatable)
    #[arg(short = 'c', long)]
    pub country: Vec<String>,

    /// Year (repeatable)
    #[arg(short = 'y', long)]
    pub year: Vec<i64>,

    /// Region (repeatable)
    #[arg(short = 'r', long)]
    pub region: Vec<String>,

    /// First year of a range
    #[arg(long = "from", requires = "to")]
    pub from: Option<i64>,

    /// Last year of a range
    #[arg(long = "to", requires = "from")]
    pub to: Option<i64>,
}

impl FilterArgs {
    /// Explicit years plus the `--from`/`--to` range.
    pub fn years(&self) -> Vec<i64> {
        let mut years = self.year.clone();
        if let (Some(from), Some(to)) = (self.from, self.to) {
            years.extend(from.min(to)..=from.max(to));
        }
        years
    }

    pub fn to_filter(&self) -> SpeechFilter {
        SpeechFilter::new()
            .with_countries(self.country.iter().cloned())
            .with_years(self.years())
            .with_regions(self.region.iter().cloned())
    }
}
