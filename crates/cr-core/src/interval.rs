//! Clipping events to work windows and merging overlapping intervals.
//!
//! Two totals come out of this module and they differ on purpose:
//! - raw time sums every event's clipped duration, overlaps included;
//! - busy time is the union of the clipped intervals, so two meetings
//!   booked over the same hour count that hour once.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate};
use chrono_tz::Tz;
use rayon::prelude::*;

use crate::calendar::{WorkCalendar, dates_inclusive};
use crate::event::CalendarEvent;

/// A non-empty half-open span `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    start: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl Interval {
    /// Returns `None` unless `start < end`.
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub const fn start(&self) -> DateTime<Tz> {
        self.start
    }

    pub const fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    fn duration_ms(&self) -> i64 {
        self.duration().num_milliseconds()
    }
}

/// The part of one event inside one date's work window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClippedInterval {
    pub date: NaiveDate,
    pub interval: Interval,
}

impl WorkCalendar {
    /// Intersects `event` with the work window of `date`.
    pub fn clip(&self, event: &CalendarEvent, date: NaiveDate) -> Option<ClippedInterval> {
        let tz = event.start.timezone();
        let (work_start, work_end) = self.window(date.weekday()).bounds(date, &tz)?;
        let interval = Interval::new(event.start.max(work_start), event.end.min(work_end))?;
        Some(ClippedInterval { date, interval })
    }

    /// Clips `event` against every date it touches, start and end dates included.
    pub fn clip_event(&self, event: &CalendarEvent) -> Vec<ClippedInterval> {
        dates_inclusive(event.start.date_naive(), event.end.date_naive())
            .filter_map(|date| self.clip(event, date))
            .collect()
    }
}

/// Total work time of clipped pieces, overlaps counted twice.
pub fn work_time(pieces: &[ClippedInterval]) -> Duration {
    pieces
        .iter()
        .map(|clipped| clipped.interval.duration())
        .fold(Duration::zero(), |acc, d| acc + d)
}

/// Disjoint intervals covering a day's busy time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedDay {
    pub intervals: Vec<Interval>,
    pub total: Duration,
}

/// Merges one day's intervals into the minimal disjoint set covering them.
///
/// Touching intervals (`next.start == current.end`) are joined.
pub fn merge(intervals: &[Interval]) -> MergedDay {
    let mut sorted = intervals.to_vec();
    sorted.sort_by_key(|interval| interval.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
            } else {
                merged.push(interval);
            }
        } else {
            merged.push(interval);
        }
    }

    let total_ms: i64 = merged.iter().map(Interval::duration_ms).sum();
    MergedDay {
        intervals: merged,
        total: Duration::milliseconds(total_ms),
    }
}

/// Clipped intervals grouped by date.
pub type DayIntervals = BTreeMap<NaiveDate, Vec<Interval>>;

/// Groups clipped intervals by their date.
pub fn group_by_day<I>(clipped: I) -> DayIntervals
where
    I: IntoIterator<Item = ClippedInterval>,
{
    let mut days = DayIntervals::new();
    for ClippedInterval { date, interval } in clipped {
        days.entry(date).or_default().push(interval);
    }
    days
}

/// Busy time summed over every day. Days are merged independently.
pub fn busy_time(days: &DayIntervals) -> Duration {
    let total_ms: i64 = days
        .par_iter()
        .map(|(date, intervals)| {
            let merged = merge(intervals);
            tracing::debug!(
                %date,
                clipped = intervals.len(),
                merged = merged.intervals.len(),
                busy_ms = merged.total.num_milliseconds(),
                "merged day"
            );
            merged.total.num_milliseconds()
        })
        .sum();
    Duration::milliseconds(total_ms)
}
