//! Core accounting logic for calendar reports.
//!
//! This crate turns a snapshot of calendar events into a report of how
//! work hours were spent:
//! - Calendar: per-weekday work windows and report date ranges
//! - Interval: clipping events to work windows and merging overlaps
//! - Holiday: whole-day holidays and the work hours they remove
//! - Category and budget: label mapping and min/warn/max classification
//! - Report: the aggregation tying the above together

pub mod budget;
pub mod calendar;
pub mod category;
mod config;
pub mod event;
pub mod holiday;
pub mod interval;
mod report;
mod types;

pub use budget::{Budget, BudgetStatus, BudgetTable, FreeTimeTarget};
pub use calendar::{DateRange, WorkCalendar, WorkWindow};
pub use category::{Categorization, Category, CategoryRules, CategorySource, UnknownCategory};
pub use config::EngineConfig;
pub use event::CalendarEvent;
pub use holiday::{HolidayAdjustment, compute_adjustment, is_full_day_holiday};
pub use interval::{ClippedInterval, Interval, MergedDay, merge};
pub use report::{
    Diagnostics, EventDiagnostic, Report, ReportResult, aggregate, aggregate_with_diagnostics,
};
pub use types::{ConfigError, EventError};
