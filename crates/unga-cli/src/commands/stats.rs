//! Statistics commands.

use super::FilterArgs;
use crate::render::{self, display_or_empty};
use crate::Context;
use clap::Args;

/// Trends command arguments.
#[derive(Args)]
pub struct TrendsArgs {
    #[command(flatten)]
    pub filters: FilterArgs,
}

impl TrendsArgs {
    pub fn years(&self) -> Vec<i64> {
        self.filters.years()
    }
}

pub fn stats(ctx: &Context) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let stats = display_or_empty("get_statistics", store.get_statistics());
    if ctx.json {
        return render::print_json(&stats);
    }
    render::render_statistics(&stats);
    Ok(())
}

pub fn trends(ctx: &Context, args: TrendsArgs) -> anyhow::Result<()> {
    let store = ctx.open_store()?;
    let filter = args.filters.to_filter();
    let trends = display_or_empty(
        "cross_year_trends",
        store.cross_year_trends(&filter, &args.years()),
    );
    if ctx.json {
        return render::print_json(&trends);
    }
    render::render_trends(&trends);
    Ok(())
}
