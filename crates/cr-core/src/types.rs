//! Error types and small shared helpers.

use chrono::DateTime;
use chrono_tz::Tz;
use thiserror::Error;

use crate::category::Category;

/// Configuration errors, detected once at load time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A budget threshold was negative.
    #[error("budget for {category}: min must be >= 0, got {min}")]
    NegativeMin { category: Category, min: f64 },

    /// A budget's warning threshold sits below its minimum.
    #[error("budget for {category}: min ({min}) exceeds warn ({warn})")]
    MinAboveWarn {
        category: Category,
        min: f64,
        warn: f64,
    },

    /// A budget's warning threshold sits above its maximum.
    #[error("budget for {category}: warn ({warn}) exceeds max ({max})")]
    WarnAboveMax {
        category: Category,
        warn: f64,
        max: f64,
    },

    /// A work window starts at an hour that does not exist.
    #[error("work window for {weekday}: start hour must be 0-23, got {start_hour}")]
    StartHourOutOfRange { weekday: String, start_hour: u32 },

    /// A work window has a negative length.
    #[error("work window for {weekday}: duration must be >= 0, got {duration_hours}")]
    NegativeDuration {
        weekday: String,
        duration_hours: i64,
    },

    /// A work window runs past midnight into the next day.
    #[error("work window for {weekday}: {start_hour}:00 + {duration_hours}h runs past midnight")]
    WindowPastMidnight {
        weekday: String,
        start_hour: u32,
        duration_hours: i64,
    },

    /// The free-time target is inverted.
    #[error("free time target: min ({min}) exceeds max ({max})")]
    FreeTimeInverted { min: f64, max: f64 },
}

/// Reasons an individual event is rejected by the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The event ends at or before its start.
    #[error("event {subject:?} ends at {end} which is not after its start {start}")]
    EndNotAfterStart {
        subject: String,
        start: String,
        end: String,
    },
}

/// Converts milliseconds to fractional hours.
#[allow(clippy::cast_precision_loss)]
pub fn ms_to_hours(ms: i64) -> f64 {
    ms as f64 / 3_600_000.0
}

/// Returns true if the timestamp sits exactly on a wall-clock midnight.
pub fn is_midnight(ts: &DateTime<Tz>) -> bool {
    use chrono::Timelike;
    ts.hour() == 0 && ts.minute() == 0 && ts.second() == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    #[test]
    fn ms_to_hours_is_fractional() {
        assert!((ms_to_hours(5_400_000) - 1.5).abs() < f64::EPSILON);
        assert!(ms_to_hours(0).abs() < f64::EPSILON);
    }

    #[test]
    fn midnight_detection_uses_wall_clock() {
        let midnight = Los_Angeles
            .with_ymd_and_hms(2024, 1, 15, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let half_past = Los_Angeles
            .with_ymd_and_hms(2024, 1, 15, 0, 30, 0)
            .single()
            .expect("valid timestamp");
        assert!(is_midnight(&midnight));
        assert!(!is_midnight(&half_past));
    }

    #[test]
    fn config_error_messages_name_the_category() {
        let err = ConfigError::WarnAboveMax {
            category: Category::FocusTime,
            warn: 16.0,
            max: 15.0,
        };
        assert_eq!(
            err.to_string(),
            "budget for Focus Time: warn (16) exceeds max (15)"
        );
    }
}
