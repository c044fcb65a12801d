//! Immutable engine configuration.

use serde::{Deserialize, Serialize};

use crate::budget::{BudgetTable, FreeTimeTarget, default_budgets};
use crate::calendar::WorkCalendar;
use crate::category::CategoryRules;
use crate::types::ConfigError;

/// Everything the accounting engine needs besides the events themselves.
///
/// Built once at startup, validated, then shared by reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub calendar: WorkCalendar,
    #[serde(default = "default_budgets")]
    pub budgets: BudgetTable,
    #[serde(default)]
    pub categories: CategoryRules,
    #[serde(default)]
    pub free_time: FreeTimeTarget,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            calendar: WorkCalendar::default(),
            budgets: default_budgets(),
            categories: CategoryRules::default(),
            free_time: FreeTimeTarget::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar.validate()?;
        for (category, budget) in &self.budgets {
            budget.validate(*category)?;
        }
        if self.free_time.min > self.free_time.max {
            return Err(ConfigError::FreeTimeInverted {
                min: self.free_time.min,
                max: self.free_time.max,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::Budget;
    use crate::calendar::WorkWindow;
    use crate::category::Category;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn bad_budget_fails_validation() {
        let mut config = EngineConfig::default();
        config
            .budgets
            .insert(Category::FocusTime, Budget::new(12.0, 16.0, 15.0));

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::WarnAboveMax { category: Category::FocusTime, .. }));
    }

    #[test]
    fn bad_window_fails_validation() {
        let mut config = EngineConfig::default();
        config.calendar.friday = WorkWindow::new(8, -2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeDuration { .. })
        ));
    }

    #[test]
    fn inverted_free_time_fails_validation() {
        let mut config = EngineConfig::default();
        config.free_time = FreeTimeTarget { min: 30.0, max: 5.0 };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FreeTimeInverted { .. })
        ));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"budgets": {"Focus Time": {"min": 1, "warn": 2, "max": 3}}}"#)
                .unwrap();
        assert_eq!(config.budgets.len(), 1);
        assert_eq!(config.calendar, WorkCalendar::default());
        assert_eq!(config.categories.default, Category::WorkMeeting);
    }
}
