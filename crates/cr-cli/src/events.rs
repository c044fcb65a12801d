//! Loading calendar events from JSON Lines exports.
//!
//! Each line is one event:
//!
//! ```json
//! {"subject": "Standup", "start": "2024-01-16T09:00:00-08:00", "end": "2024-01-16T09:15:00-08:00",
//!  "categories": "Work Meeting", "busy_status": "busy", "cancelled": false}
//! ```
//!
//! Timestamps with an offset are converted to the reference timezone;
//! timestamps without one are read as reference-timezone wall-clock time.

use std::collections::HashSet;
use std::io::BufRead;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use chrono_tz::Tz;
use cr_core::calendar::localize;
use cr_core::{CalendarEvent, CategoryRules, DateRange};
use serde::Deserialize;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Free/busy state as exported by calendar clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum BusyStatus {
    Free,
    Tentative,
    #[default]
    Busy,
    OutOfOffice,
    WorkingElsewhere,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default = "default_subject")]
    subject: String,
    start: String,
    end: String,
    #[serde(default)]
    categories: String,
    #[serde(default)]
    busy_status: BusyStatus,
    #[serde(default)]
    cancelled: bool,
}

fn default_subject() -> String {
    "Untitled".to_string()
}

/// Events ready for the engine, plus counts of what was dropped.
#[derive(Debug, Default)]
pub struct LoadedEvents {
    pub events: Vec<CalendarEvent>,
    /// Lines that were not valid JSON or had unreadable timestamps.
    pub skipped_unreadable: usize,
    pub skipped_cancelled: usize,
    pub skipped_free: usize,
    pub skipped_out_of_range: usize,
    pub duplicates: usize,
}

/// Parses a timestamp in `tz`, accepting RFC 3339 or naive wall-clock forms.
pub fn parse_timestamp(s: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(tz));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .map(|naive| localize(tz, naive))
}

/// Reads events from `reader`, keeping those a report over `range` needs.
///
/// Cancelled events and events marked free (other than holidays) are
/// dropped, as are events outside `range`. Repeats of the same
/// `(subject, start, end)` are kept once. Unreadable lines are skipped.
pub fn load_events<R: BufRead>(
    reader: R,
    tz: &Tz,
    range: DateRange,
    rules: &CategoryRules,
) -> Result<LoadedEvents> {
    let (range_start, range_end) = range.bounds(tz);
    let mut loaded = LoadedEvents::default();
    let mut seen: HashSet<(String, DateTime<Tz>, DateTime<Tz>)> = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let raw: RawEvent = match serde_json::from_str(trimmed) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(line = idx + 1, %err, "skipping invalid JSON");
                loaded.skipped_unreadable += 1;
                continue;
            }
        };

        let (Some(start), Some(end)) =
            (parse_timestamp(&raw.start, tz), parse_timestamp(&raw.end, tz))
        else {
            tracing::warn!(
                line = idx + 1,
                start = %raw.start,
                end = %raw.end,
                "skipping unreadable timestamps"
            );
            loaded.skipped_unreadable += 1;
            continue;
        };

        if raw.cancelled {
            loaded.skipped_cancelled += 1;
            continue;
        }
        if raw.busy_status == BusyStatus::Free && !rules.is_holiday_label(&raw.categories) {
            loaded.skipped_free += 1;
            continue;
        }
        // Reversed events go through so the engine can count them as malformed.
        if start < end && (start >= range_end || end <= range_start) {
            loaded.skipped_out_of_range += 1;
            continue;
        }
        if !seen.insert((raw.subject.clone(), start, end)) {
            loaded.duplicates += 1;
            continue;
        }

        loaded
            .events
            .push(CalendarEvent::new(raw.subject, start, end, raw.categories));
    }

    tracing::debug!(
        kept = loaded.events.len(),
        unreadable = loaded.skipped_unreadable,
        cancelled = loaded.skipped_cancelled,
        free = loaded.skipped_free,
        out_of_range = loaded.skipped_out_of_range,
        duplicates = loaded.duplicates,
        "loaded events"
    );

    Ok(loaded)
}
