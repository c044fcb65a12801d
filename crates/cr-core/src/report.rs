//! Report aggregation over a snapshot of calendar events.
//!
//! # Algorithm Summary
//!
//! 1. Find whole-day holidays; collect their dates and the hours they remove
//! 2. Split events into accounted and holiday-filtered
//! 3. Clip each accounted event to the work windows of every date it touches
//! 4. Sum clipped time per category (raw time)
//! 5. Merge clipped intervals per date and sum the unions (busy time)
//! 6. Adjusted work hours = weekly hours - holiday reduction, floored at 0
//! 7. Free hours = adjusted work hours - busy hours, floored at 0
//! 8. Classify every budgeted category, zero-hour ones included

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::Serialize;

use crate::budget::{BudgetStatus, evaluate};
use crate::calendar::DateRange;
use crate::category::{Categorization, Category};
use crate::config::EngineConfig;
use crate::event::CalendarEvent;
use crate::holiday::{compute_adjustment, is_full_day_holiday};
use crate::interval::{ClippedInterval, busy_time, group_by_day, work_time};
use crate::types::ms_to_hours;

const MS_PER_HOUR: i64 = 3_600_000;

/// The outcome of one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportResult {
    pub range: DateRange,
    /// Events that overlap work hours or are whole-day holidays.
    pub events_analyzed: usize,
    /// Clipped hours per category, overlaps counted twice. Every budgeted
    /// category appears, at zero when nothing was booked against it.
    pub per_category_hours: BTreeMap<Category, f64>,
    /// Sum of `per_category_hours`.
    pub raw_hours_total: f64,
    /// Union of clipped intervals across all dates.
    pub busy_hours_total: f64,
    pub free_hours: f64,
    pub holiday_reduction_hours: f64,
    pub adjusted_work_hours_total: f64,
    /// Status of every category with a configured budget.
    pub per_category_status: BTreeMap<Category, BudgetStatus>,
}

impl ReportResult {
    /// Accumulated hours for `category`, zero when nothing was accounted.
    pub fn hours(&self, category: Category) -> f64 {
        self.per_category_hours.get(&category).copied().unwrap_or(0.0)
    }

    pub fn status(&self, category: Category) -> Option<BudgetStatus> {
        self.per_category_status.get(&category).copied()
    }

    pub fn has_holiday(&self) -> bool {
        self.holiday_reduction_hours > 0.0
    }
}

/// Per-event annotations for verbose output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDiagnostic {
    pub subject: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub categorization: Categorization,
    pub work_hours: f64,
    pub full_day_holiday: bool,
    pub filtered_by_holiday: bool,
    pub outside_work_hours: bool,
}

/// Secondary output explaining how each event was treated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    pub events: Vec<EventDiagnostic>,
    pub holiday_dates: Vec<NaiveDate>,
    /// Events dropped because they end at or before their start.
    pub skipped_malformed: usize,
}

/// A report plus its diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub result: ReportResult,
    pub diagnostics: Diagnostics,
}

/// Builds the report for `events` over `range`.
pub fn aggregate(
    events: &[CalendarEvent],
    range: DateRange,
    config: &EngineConfig,
) -> ReportResult {
    aggregate_with_diagnostics(events, range, config).result
}

/// Builds the report and the per-event diagnostic listing.
///
/// Malformed events are skipped and counted; they never abort the run.
pub fn aggregate_with_diagnostics(
    events: &[CalendarEvent],
    range: DateRange,
    config: &EngineConfig,
) -> Report {
    let calendar = &config.calendar;
    let rules = &config.categories;

    let mut skipped_malformed: usize = 0;
    let valid: Vec<&CalendarEvent> = events
        .iter()
        .filter(|event| match event.validate() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "skipping malformed event");
                skipped_malformed += 1;
                false
            }
        })
        .collect();

    let adjustment = compute_adjustment(valid.iter().copied(), calendar, rules);

    // Budgeted categories are reported even when nothing was booked.
    let mut category_ms: BTreeMap<Category, i64> =
        config.budgets.keys().map(|&category| (category, 0)).collect();
    let mut busy_pieces: Vec<ClippedInterval> = Vec::new();
    let mut diagnostics = Vec::with_capacity(valid.len());
    let mut events_analyzed: usize = 0;

    for event in valid {
        let full_day_holiday = is_full_day_holiday(event, rules);
        let filtered_by_holiday = adjustment.filters(event, rules);
        let categorization = rules.categorize_detailed(&event.categories);
        let clipped = calendar.clip_event(event);
        let work_ms = work_time(&clipped).num_milliseconds();
        let outside_work_hours = work_ms == 0;

        if !outside_work_hours || full_day_holiday {
            events_analyzed += 1;
        }

        if !(full_day_holiday || filtered_by_holiday || outside_work_hours) {
            *category_ms.entry(categorization.category).or_insert(0) += work_ms;
            busy_pieces.extend(clipped.into_iter().filter(|c| !adjustment.covers(c.date)));
        } else if filtered_by_holiday {
            tracing::debug!(subject = %event.subject, "event falls on a holiday");
        }

        diagnostics.push(EventDiagnostic {
            subject: event.subject.clone(),
            start: event.start,
            end: event.end,
            categorization,
            work_hours: ms_to_hours(work_ms),
            full_day_holiday,
            filtered_by_holiday,
            outside_work_hours,
        });
    }

    let busy_ms = busy_time(&group_by_day(busy_pieces)).num_milliseconds();
    let adjusted_ms = (calendar.weekly_hours() - adjustment.hours_reduction).max(0) * MS_PER_HOUR;
    let free_ms = (adjusted_ms - busy_ms).max(0);

    let per_category_hours: BTreeMap<Category, f64> = category_ms
        .iter()
        .map(|(&category, &ms)| (category, ms_to_hours(ms)))
        .collect();
    let raw_hours_total = ms_to_hours(category_ms.values().sum());

    let per_category_status = per_category_hours
        .iter()
        .filter_map(|(&category, &hours)| {
            evaluate(&config.budgets, category, hours).map(|status| (category, status))
        })
        .collect();

    tracing::debug!(
        events_analyzed,
        skipped_malformed,
        busy_ms,
        free_ms,
        "report aggregated"
    );

    Report {
        result: ReportResult {
            range,
            events_analyzed,
            per_category_hours,
            raw_hours_total,
            busy_hours_total: ms_to_hours(busy_ms),
            free_hours: ms_to_hours(free_ms),
            holiday_reduction_hours: ms_to_hours(adjustment.hours_reduction * MS_PER_HOUR),
            adjusted_work_hours_total: ms_to_hours(adjusted_ms),
            per_category_status,
        },
        diagnostics: Diagnostics {
            events: diagnostics,
            holiday_dates: adjustment.dates.into_iter().collect(),
            skipped_malformed,
        },
    }
}
