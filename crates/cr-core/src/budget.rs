//! Per-category hour budgets and their evaluation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::types::ConfigError;

/// Hour thresholds for one category. Expected: `0 <= min <= warn <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub min: f64,
    pub warn: f64,
    pub max: f64,
}

impl Budget {
    pub const fn new(min: f64, warn: f64, max: f64) -> Self {
        Self { min, warn, max }
    }

    /// Classifies accumulated hours against this budget.
    ///
    /// Checks run in a fixed priority (exceeded, warning, below min) and the
    /// first match wins, so an inverted budget still yields one answer.
    pub fn evaluate(&self, hours: f64) -> BudgetStatus {
        if hours > self.max {
            BudgetStatus::Exceeded
        } else if hours > self.warn {
            BudgetStatus::Warning
        } else if hours < self.min {
            BudgetStatus::BelowMin
        } else {
            BudgetStatus::Ok
        }
    }

    /// Hours left before `max`. Negative once exceeded.
    pub fn remaining(&self, hours: f64) -> f64 {
        self.max - hours
    }

    /// Human-readable target, e.g. `12-15 hours` or `<= 8 hours`.
    pub fn range_label(&self) -> String {
        if self.min > 0.0 {
            format!("{}-{} hours", self.min, self.max)
        } else {
            format!("<= {} hours", self.max)
        }
    }

    pub(crate) fn validate(&self, category: Category) -> Result<(), ConfigError> {
        if self.min < 0.0 {
            return Err(ConfigError::NegativeMin {
                category,
                min: self.min,
            });
        }
        if self.min > self.warn {
            return Err(ConfigError::MinAboveWarn {
                category,
                min: self.min,
                warn: self.warn,
            });
        }
        if self.warn > self.max {
            return Err(ConfigError::WarnAboveMax {
                category,
                warn: self.warn,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Outcome of comparing accumulated hours to a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    Exceeded,
    Warning,
    BelowMin,
    Ok,
}

impl BudgetStatus {
    /// Human-readable label, e.g. `Below min`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exceeded => "Exceeded",
            Self::Warning => "Warning",
            Self::BelowMin => "Below min",
            Self::Ok => "OK",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budgets keyed by category. Categories without an entry get no status.
pub type BudgetTable = BTreeMap<Category, Budget>;

/// The budgets the calendar report has always shipped with.
pub fn default_budgets() -> BudgetTable {
    BTreeMap::from([
        (Category::FocusTime, Budget::new(12.0, 14.0, 15.0)),
        (Category::Collaboration, Budget::new(4.0, 6.0, 8.0)),
        (Category::Communication, Budget::new(0.0, 6.0, 8.0)),
        (Category::WorkMeeting, Budget::new(0.0, 10.0, 12.0)),
        (Category::Unavailable, Budget::new(0.0, 5.0, 6.0)),
    ])
}

/// Evaluates one category, returning `None` when it has no budget.
pub fn evaluate(
    budgets: &BudgetTable,
    category: Category,
    hours: f64,
) -> Option<BudgetStatus> {
    budgets.get(&category).map(|budget| budget.evaluate(hours))
}

/// Free-time target. Display only; no status is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FreeTimeTarget {
    pub min: f64,
    pub max: f64,
}

impl Default for FreeTimeTarget {
    fn default() -> Self {
        Self {
            min: 5.0,
            max: 25.0,
        }
    }
}

impl FreeTimeTarget {
    pub fn range_label(&self) -> String {
        format!("{}-{} hours", self.min, self.max)
    }
}
