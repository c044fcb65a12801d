//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono_tz::Tz;
use cr_core::{BudgetTable, CategoryRules, EngineConfig, FreeTimeTarget, WorkCalendar};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA name of the reference timezone events are normalized to.
    pub timezone: String,
    /// Default JSON Lines event file, used when `--events` is not given.
    pub events_path: Option<PathBuf>,
    pub calendar: WorkCalendar,
    pub budgets: BudgetTable,
    pub categories: CategoryRules,
    pub free_time: FreeTimeTarget,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("timezone", &self.timezone)
            .field("events_path", &self.events_path)
            .field("budgets", &self.budgets.len())
            .finish_non_exhaustive()
    }
}

impl Default for Config {
    fn default() -> Self {
        let engine = EngineConfig::default();
        Self {
            timezone: "America/Los_Angeles".to_string(),
            events_path: None,
            calendar: engine.calendar,
            budgets: engine.budgets,
            categories: engine.categories,
            free_time: engine.free_time,
        }
    }
}

impl Config {
    /// Loads configuration from default locations, then `config_path` if given.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (CALREPORT_*), `__` separates nesting
        figment = figment.merge(Env::prefixed("CALREPORT_").split("__"));

        figment.extract()
    }

    /// Parses the reference timezone name.
    pub fn reference_timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| anyhow::anyhow!("{err}"))
            .with_context(|| format!("unknown timezone: {}", self.timezone))
    }

    /// The engine's view of this configuration.
    pub fn engine(&self) -> EngineConfig {
        EngineConfig {
            calendar: self.calendar,
            budgets: self.budgets.clone(),
            categories: self.categories.clone(),
            free_time: self.free_time,
        }
    }

    /// Checks every setting the report depends on. Run once after loading.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.reference_timezone()?;
        self.engine()
            .validate()
            .context("invalid report configuration")?;
        Ok(())
    }
}

/// Returns the platform-specific config directory for calreport.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("calreport"))
}
