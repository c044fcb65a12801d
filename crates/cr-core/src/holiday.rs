//! Whole-day holiday detection and the work-hour reduction it implies.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::calendar::WorkCalendar;
use crate::category::CategoryRules;
use crate::event::CalendarEvent;
use crate::types::is_midnight;

/// Dates taken off by whole-day holidays and the hours they remove.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HolidayAdjustment {
    pub dates: BTreeSet<NaiveDate>,
    pub hours_reduction: i64,
}

impl HolidayAdjustment {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    /// True for ordinary events that start on a holiday date.
    ///
    /// Whole-day holiday events themselves are never reported as filtered.
    pub fn filters(&self, event: &CalendarEvent, rules: &CategoryRules) -> bool {
        !is_full_day_holiday(event, rules) && self.covers(event.start.date_naive())
    }
}

/// A holiday-category event running midnight to midnight for at least 24 hours.
///
/// The span is measured in elapsed time, so a single 23-hour spring-forward
/// day does not qualify.
pub fn is_full_day_holiday(event: &CalendarEvent, rules: &CategoryRules) -> bool {
    rules.is_holiday_label(&event.categories)
        && is_midnight(&event.start)
        && is_midnight(&event.end)
        && event.span() >= Duration::hours(24)
}

/// Collects holiday dates from every whole-day holiday event.
///
/// Each holiday covers `[start date, end date)`. A date covered by several
/// holidays is counted once. Weekend dates join the set but reduce nothing
/// when their window has no hours.
pub fn compute_adjustment<'a, I>(
    events: I,
    calendar: &WorkCalendar,
    rules: &CategoryRules,
) -> HolidayAdjustment
where
    I: IntoIterator<Item = &'a CalendarEvent>,
{
    let dates: BTreeSet<NaiveDate> = events
        .into_iter()
        .filter(|event| is_full_day_holiday(event, rules))
        .flat_map(|event| {
            let last = event.end.date_naive();
            event
                .start
                .date_naive()
                .iter_days()
                .take_while(move |date| *date < last)
        })
        .collect();

    let hours_reduction: i64 = dates.iter().map(|&date| calendar.hours_on(date)).sum();

    if !dates.is_empty() {
        tracing::debug!(?dates, hours_reduction, "holiday adjustment");
    }

    HolidayAdjustment {
        dates,
        hours_reduction,
    }
}
