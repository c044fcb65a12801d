//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Calendar category usage report.
///
/// Reads calendar events and reports how work hours were spent in each
/// category against configured budgets.
#[derive(Debug, Parser)]
#[command(name = "calreport", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output, including the per-event listing.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report time per category for a work week or date range.
    Report(ReportArgs),

    /// Print the effective configuration as JSON.
    Config,
}

/// Options for `calreport report`.
#[derive(Debug, Default, Args)]
pub struct ReportArgs {
    /// Analyze the previous work week (Mon-Fri).
    #[arg(long, conflicts_with_all = ["next_week", "start"])]
    pub last_week: bool,

    /// Analyze the next work week (Mon-Fri).
    #[arg(long, conflicts_with = "start")]
    pub next_week: bool,

    /// First date to analyze (yyyy-MM-dd). Alone, selects that date's work week.
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last date to analyze, inclusive (yyyy-MM-dd). Requires --start.
    #[arg(long, value_name = "DATE", requires = "start")]
    pub end: Option<NaiveDate>,

    /// JSON Lines file of calendar events. Reads stdin when omitted or `-`.
    #[arg(long, value_name = "PATH")]
    pub events: Option<PathBuf>,

    /// Output the report as JSON.
    #[arg(long)]
    pub json: bool,
}
