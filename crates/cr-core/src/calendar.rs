//! Weekly work windows and report date ranges.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::types::ConfigError;

/// The work hours of one weekday: `start_hour:00` for `duration_hours`.
///
/// A zero duration means no work that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub start_hour: u32,
    pub duration_hours: i64,
}

impl WorkWindow {
    pub const fn new(start_hour: u32, duration_hours: i64) -> Self {
        Self {
            start_hour,
            duration_hours,
        }
    }

    /// A day with no work hours.
    pub const fn off(start_hour: u32) -> Self {
        Self::new(start_hour, 0)
    }

    pub const fn is_off(&self) -> bool {
        self.duration_hours <= 0
    }

    /// The window's `[start, end)` on `date` in `tz`, or `None` on days off.
    pub fn bounds(&self, date: NaiveDate, tz: &Tz) -> Option<(DateTime<Tz>, DateTime<Tz>)> {
        if self.is_off() {
            return None;
        }
        let time = NaiveTime::from_hms_opt(self.start_hour, 0, 0)?;
        let start = localize(tz, date.and_time(time));
        Some((start, start + Duration::hours(self.duration_hours)))
    }

    fn validate(&self, weekday: Weekday) -> Result<(), ConfigError> {
        if self.start_hour > 23 {
            return Err(ConfigError::StartHourOutOfRange {
                weekday: weekday.to_string(),
                start_hour: self.start_hour,
            });
        }
        if self.duration_hours < 0 {
            return Err(ConfigError::NegativeDuration {
                weekday: weekday.to_string(),
                duration_hours: self.duration_hours,
            });
        }
        if i64::from(self.start_hour) + self.duration_hours > 24 {
            return Err(ConfigError::WindowPastMidnight {
                weekday: weekday.to_string(),
                start_hour: self.start_hour,
                duration_hours: self.duration_hours,
            });
        }
        Ok(())
    }
}

/// Work windows for every day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCalendar {
    pub monday: WorkWindow,
    pub tuesday: WorkWindow,
    pub wednesday: WorkWindow,
    pub thursday: WorkWindow,
    pub friday: WorkWindow,
    pub saturday: WorkWindow,
    pub sunday: WorkWindow,
}

impl Default for WorkCalendar {
    /// Mon-Wed 9am-5pm, Thu-Fri 8am-5pm, weekends off.
    fn default() -> Self {
        Self {
            monday: WorkWindow::new(9, 8),
            tuesday: WorkWindow::new(9, 8),
            wednesday: WorkWindow::new(9, 8),
            thursday: WorkWindow::new(8, 9),
            friday: WorkWindow::new(8, 9),
            saturday: WorkWindow::off(9),
            sunday: WorkWindow::off(9),
        }
    }
}

impl WorkCalendar {
    pub const fn window(&self, weekday: Weekday) -> &WorkWindow {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    /// Work hours configured for the weekday of `date`.
    pub fn hours_on(&self, date: NaiveDate) -> i64 {
        self.window(date.weekday()).duration_hours.max(0)
    }

    /// Total work hours in one week.
    pub fn weekly_hours(&self) -> i64 {
        WEEK.iter()
            .map(|&day| self.window(day).duration_hours.max(0))
            .sum()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for day in WEEK {
            self.window(day).validate(day)?;
        }
        Ok(())
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// An inclusive range of calendar dates covered by a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[start 00:00, end+1 00:00)` in `tz`.
    pub fn bounds(&self, tz: &Tz) -> (DateTime<Tz>, DateTime<Tz>) {
        let start = localize(tz, self.start.and_time(NaiveTime::MIN));
        let end = localize(tz, (self.end + Duration::days(1)).and_time(NaiveTime::MIN));
        (start, end)
    }
}

/// Dates from `first` to `last`, both included.
pub fn dates_inclusive(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first.iter_days().take_while(move |date| *date <= last)
}

/// Resolves a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant. Times inside a
/// spring-forward gap move one hour later.
pub fn localize(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}
