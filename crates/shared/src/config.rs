//! Application configuration management.

use serde::Deserialize;

use crate::types::{Segment, SortMode, WeekStart};

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Calendar configuration.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// View defaults (the user-preferences store).
    #[serde(default)]
    pub view: ViewConfig,
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,
}

/// Calendar configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarConfig {
    /// First day of the week used for weekly and biweekly periods.
    #[serde(default)]
    pub week_start: WeekStart,
}

/// Default view selection for newly created budget views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewConfig {
    /// Segment shown when a budget view is first opened.
    #[serde(default)]
    pub default_segment: Segment,
    /// Sort mode applied when a budget view is first opened.
    #[serde(default)]
    pub default_sort: SortMode,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Fallback `EnvFilter` directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "pennywise=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PENNYWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
