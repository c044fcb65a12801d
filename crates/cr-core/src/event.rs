//! Calendar events as seen by the accounting engine.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;
use serde::Serialize;

use crate::types::EventError;

/// One calendar event, already normalized to the reference timezone.
///
/// Upstream sources guarantee `start < end`; the engine still checks with
/// [`validate`](Self::validate) and skips events that break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub subject: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Raw comma-separated category labels from the calendar client.
    pub categories: String,
}

impl CalendarEvent {
    pub fn new(
        subject: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        categories: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            start,
            end,
            categories: categories.into(),
        }
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }

    pub fn validate(&self) -> Result<(), EventError> {
        if self.end <= self.start {
            return Err(EventError::EndNotAfterStart {
                subject: self.subject.clone(),
                start: self.start.to_rfc3339(),
                end: self.end.to_rfc3339(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::America::Los_Angeles;

    fn at(hour: u32) -> DateTime<Tz> {
        Los_Angeles
            .with_ymd_and_hms(2024, 1, 16, hour, 0, 0)
            .single()
            .expect("valid test timestamp")
    }

    #[test]
    fn well_formed_event_validates() {
        let event = CalendarEvent::new("Standup", at(9), at(10), "");
        assert!(event.validate().is_ok());
        assert_eq!(event.span(), Duration::hours(1));
    }

    #[test]
    fn zero_length_event_is_rejected() {
        let event = CalendarEvent::new("Blip", at(9), at(9), "");
        let err = event.validate().unwrap_err();
        assert!(err.to_string().contains("\"Blip\""));
    }

    #[test]
    fn reversed_event_is_rejected() {
        let event = CalendarEvent::new("Backwards", at(11), at(10), "Focus Time");
        assert!(matches!(
            event.validate(),
            Err(EventError::EndNotAfterStart { .. })
        ));
    }
}
