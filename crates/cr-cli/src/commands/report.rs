//! Report command for calendar category usage.
//!
//! This module implements `calreport report`: it resolves the date range
//! (current, last or next work week, or explicit dates), loads events,
//! runs the aggregation and renders the result as Markdown and a
//! fixed-width table, or as JSON.

use std::fmt::{self, Write};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use cr_core::{
    BudgetStatus, Category, CategorySource, DateRange, Diagnostics, EngineConfig, Report,
    ReportResult, aggregate_with_diagnostics,
};

use crate::cli::ReportArgs;
use crate::config::Config;
use crate::events::{LoadedEvents, load_events};

/// Which work week to report on when no dates are given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    ThisWeek,
    LastWeek,
    NextWeek,
}

impl Period {
    const fn week_offset(self) -> i64 {
        match self {
            Self::ThisWeek => 0,
            Self::LastWeek => -1,
            Self::NextWeek => 1,
        }
    }
}

// ========== Date Range Resolution ==========

/// Monday through Friday of the week containing `date`.
pub fn work_week(date: NaiveDate) -> DateRange {
    let days_since_monday = date.weekday().num_days_from_monday();
    let monday = date - Duration::days(i64::from(days_since_monday));
    DateRange::new(monday, monday + Duration::days(4))
}

/// Resolves the report range from command-line options.
pub fn resolve_range(args: &ReportArgs, today: NaiveDate) -> Result<DateRange> {
    match (args.start, args.end) {
        (Some(start), Some(end)) => {
            if end < start {
                bail!("--end date ({end}) cannot precede --start date ({start})");
            }
            Ok(DateRange::new(start, end))
        }
        (Some(start), None) => Ok(work_week(start)),
        (None, Some(_)) => bail!("--end requires --start to be specified"),
        (None, None) => {
            let period = match (args.last_week, args.next_week) {
                (true, true) => bail!("cannot specify both --last-week and --next-week"),
                (true, false) => Period::LastWeek,
                (false, true) => Period::NextWeek,
                (false, false) => Period::ThisWeek,
            };
            Ok(work_week(today + Duration::weeks(period.week_offset())))
        }
    }
}

// ========== Table Rows ==========

/// One line of the category table.
#[derive(Debug, Clone, PartialEq)]
struct Row {
    label: &'static str,
    range: String,
    hours: f64,
    remaining: Option<f64>,
    warning: &'static str,
}

/// `OK` is shown as an empty cell.
const fn warning_text(status: Option<BudgetStatus>) -> &'static str {
    match status {
        Some(BudgetStatus::Ok) | None => "",
        Some(status) => status.as_str(),
    }
}

/// Unavailable sorts after the other categories, and the holiday category last.
fn display_order(category: Category, config: &EngineConfig) -> (u8, &'static str) {
    let rank = if category == config.categories.holiday {
        2
    } else if category == Category::Unavailable {
        1
    } else {
        0
    };
    (rank, category.as_str())
}

fn table_rows(result: &ReportResult, config: &EngineConfig) -> Vec<Row> {
    let category_row = |category: Category, hours: f64| {
        let budget = config.budgets.get(&category);
        Row {
            label: category.as_str(),
            range: budget.map(cr_core::Budget::range_label).unwrap_or_default(),
            hours,
            remaining: budget.map(|b| b.remaining(hours)),
            warning: warning_text(result.status(category)),
        }
    };

    let mut accumulated: Vec<_> = result
        .per_category_hours
        .iter()
        .filter(|(_, hours)| **hours > 0.0)
        .collect();
    accumulated.sort_by_key(|(category, _)| display_order(**category, config));

    // Budgeted categories with nothing booked follow the accumulated rows.
    let mut idle: Vec<_> = config
        .budgets
        .keys()
        .filter(|category| result.hours(**category) <= 0.0)
        .copied()
        .collect();
    idle.sort_by_key(|category| display_order(*category, config));

    let mut rows: Vec<Row> = accumulated
        .into_iter()
        .map(|(&category, &hours)| category_row(category, hours))
        .chain(idle.into_iter().map(|category| category_row(category, 0.0)))
        .collect();

    if result.has_holiday() {
        rows.push(Row {
            label: config.categories.holiday.as_str(),
            range: String::new(),
            hours: result.holiday_reduction_hours,
            remaining: None,
            warning: "",
        });
    }

    rows.push(Row {
        label: "Free time",
        range: config.free_time.range_label(),
        hours: result.free_hours,
        remaining: None,
        warning: "",
    });

    rows
}

fn format_remaining(remaining: Option<f64>) -> String {
    remaining.map(|r| format!("{r:.2}")).unwrap_or_default()
}

// ========== Rendering ==========

/// Writes the summary lines shared by both text formats.
fn write_summary(out: &mut String, result: &ReportResult, free_label: &str) -> fmt::Result {
    writeln!(
        out,
        "Date range: {} to {}",
        result.range.start.format("%Y-%m-%d"),
        result.range.end.format("%Y-%m-%d")
    )?;
    writeln!(out, "Events analyzed: {}", result.events_analyzed)?;
    writeln!(
        out,
        "Total planned meeting time (raw): {:.2} h",
        result.raw_hours_total
    )?;
    writeln!(out, "Busy time (union): {:.2} h", result.busy_hours_total)?;
    if result.has_holiday() {
        writeln!(
            out,
            "Work hours reduced by holidays: {:.2} h",
            result.holiday_reduction_hours
        )?;
        writeln!(
            out,
            "Adjusted total work hours: {:.2} h",
            result.adjusted_work_hours_total
        )?;
    }
    writeln!(out, "{free_label}{:.2} h", result.free_hours)
}

/// Formats the report as a Markdown section.
pub fn format_markdown(
    result: &ReportResult,
    config: &EngineConfig,
    debug: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    let suffix = if debug { " (debug)" } else { "" };
    writeln!(out, "#### Weekly Calendar Usage Report{suffix}")?;
    writeln!(out)?;
    write_summary(&mut out, result, "Free time remaining: ")?;
    writeln!(out)?;
    writeln!(out, "| Category | Range | Hours | Remaining | Warning |")?;
    writeln!(out, "|----------|-------|-------|-----------|---------|")?;

    for row in table_rows(result, config) {
        writeln!(
            out,
            "| {} | {} | {:.2} | {} | {} |",
            row.label,
            row.range,
            row.hours,
            format_remaining(row.remaining),
            row.warning
        )?;
    }

    Ok(out)
}

/// Formats the report as a fixed-width plain-text table.
pub fn format_ascii(result: &ReportResult, config: &EngineConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "===== Weekly Calendar Usage Report =====")?;
    writeln!(out)?;
    write_summary(&mut out, result, "Free time remaining:       ")?;
    writeln!(out)?;

    let header = format!(
        "{:<15}{:>15}{:>10}{:>12}{:>12}",
        "Category", "Range", "Hours", "Remaining", "Warning"
    );
    writeln!(out, "{header}")?;
    writeln!(out, "{}", "-".repeat(header.len()))?;

    for row in table_rows(result, config) {
        writeln!(
            out,
            "{:<15}{:>15}{:>10.2}{:>12}{:>12}",
            row.label,
            row.range,
            row.hours,
            format_remaining(row.remaining),
            row.warning
        )?;
    }

    Ok(out)
}

/// Formats the per-event listing shown with `--verbose`.
pub fn format_debug(
    diagnostics: &Diagnostics,
    loaded: &LoadedEvents,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "===== DEBUG: All calendar items (processed) =====")?;

    let mut events: Vec<_> = diagnostics.events.iter().collect();
    events.sort_by_key(|event| event.start);

    let mut prev_date = None;
    for event in events {
        let date = event.start.date_naive();
        if prev_date.is_some_and(|prev| prev != date) {
            writeln!(out)?;
        }
        prev_date = Some(date);

        let hours = format!("{:.2}h", event.work_hours);
        let category = event.categorization.category.as_str();
        let fallback = match &event.categorization.source {
            CategorySource::Matched => String::new(),
            CategorySource::EmptyLabel => " (no label)".to_string(),
            CategorySource::Unrecognized { label } => format!(" (unrecognized label {label:?})"),
        };
        let mut markers = String::new();
        if event.full_day_holiday {
            markers.push_str(" [ALL-DAY HOLIDAY/VACATION]");
        }
        if event.filtered_by_holiday {
            markers.push_str(" [FILTERED]");
        }
        if event.outside_work_hours && !event.full_day_holiday {
            markers.push_str(" [OUTSIDE WORK HOURS]");
        }

        writeln!(
            out,
            "{} {hours:>6}  [{category:<13}] {}-{} {}{fallback}{markers}",
            date.format("%Y-%m-%d"),
            event.start.format("%H:%M"),
            event.end.format("%H:%M"),
            event.subject
        )?;
    }

    if !diagnostics.holiday_dates.is_empty() {
        let dates: Vec<String> = diagnostics
            .holiday_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        writeln!(out)?;
        writeln!(out, "Holiday dates: {}", dates.join(", "))?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "Skipped: {} malformed, {} unreadable, {} cancelled, {} free, {} out of range, {} duplicate",
        diagnostics.skipped_malformed,
        loaded.skipped_unreadable,
        loaded.skipped_cancelled,
        loaded.skipped_free,
        loaded.skipped_out_of_range,
        loaded.duplicates
    )?;

    Ok(out)
}

/// Formats the report result as JSON.
pub fn format_json(result: &ReportResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Renders both text formats, plus the event listing when `debug` is set.
pub fn format_report(
    report: &Report,
    config: &EngineConfig,
    loaded: &LoadedEvents,
    debug: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "===== Markdown Format =====")?;
    writeln!(out)?;
    out.push_str(&format_markdown(&report.result, config, debug)?);
    writeln!(out)?;
    writeln!(out)?;
    out.push_str(&format_ascii(&report.result, config)?);

    if debug {
        writeln!(out)?;
        out.push_str(&format_debug(&report.diagnostics, loaded)?);
    }

    Ok(out)
}

// ========== Public Interface ==========

fn read_events(
    path: Option<&Path>,
    tz: &chrono_tz::Tz,
    range: DateRange,
    config: &EngineConfig,
) -> Result<LoadedEvents> {
    match path {
        Some(path) if path != Path::new("-") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open events file {}", path.display()))?;
            load_events(BufReader::new(file), tz, range, &config.categories)
        }
        _ => load_events(io::stdin().lock(), tz, range, &config.categories),
    }
}

/// Runs the report command.
pub fn run(args: &ReportArgs, config: &Config, verbose: bool) -> Result<()> {
    let tz = config.reference_timezone()?;
    let today = Utc::now().with_timezone(&tz).date_naive();
    let range = resolve_range(args, today)?;
    let engine = config.engine();

    let path = args.events.as_deref().or(config.events_path.as_deref());
    let loaded = read_events(path, &tz, range, &engine)?;
    tracing::debug!(
        start = %range.start,
        end = %range.end,
        events = loaded.events.len(),
        "running report"
    );

    if loaded.events.is_empty() {
        eprintln!(
            "No calendar events found for {} to {}.",
            range.start, range.end
        );
    }

    let report = aggregate_with_diagnostics(&loaded.events, range, &engine);

    let skipped = loaded.skipped_unreadable + report.diagnostics.skipped_malformed;
    if skipped > 0 && !verbose {
        eprintln!(
            "Skipped {skipped} unreadable or malformed events \
             (run with --verbose for details)."
        );
    }

    if args.json {
        println!("{}", format_json(&report.result)?);
    } else {
        print!("{}", format_report(&report, &engine, &loaded, verbose)?);
    }

    Ok(())
}
