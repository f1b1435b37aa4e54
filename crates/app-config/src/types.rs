// In crates/app-config/src/types.rs

use serde::Deserialize;
use strategies::{ParameterCombo, Rule};

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Defaults for single backtests and the train/test split.
    #[serde(default)]
    pub backtest: BacktestSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
    /// Worker threads for parameter searches; 0 lets rayon decide.
    #[serde(default)]
    pub optimizer_threads: usize,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BacktestSettings {
    #[serde(default = "default_rule")]
    pub rule: Rule,
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    #[serde(default = "default_long_window")]
    pub long_window: usize,
    #[serde(default)]
    pub momentum_window: Option<usize>,
    #[serde(default = "default_train_fraction")]
    pub train_fraction: f64,
}

impl BacktestSettings {
    pub fn combo(&self) -> ParameterCombo {
        ParameterCombo::new(self.short_window, self.long_window, self.momentum_window)
    }
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            rule: default_rule(),
            short_window: default_short_window(),
            long_window: default_long_window(),
            momentum_window: None,
            train_fraction: default_train_fraction(),
        }
    }
}

/// Helper functions for serde defaults
fn default_rule() -> Rule {
    Rule::SmaCross
}
fn default_short_window() -> usize {
    20
}
fn default_long_window() -> usize {
    50
}
fn default_train_fraction() -> f64 {
    0.7
}
