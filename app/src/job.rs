// In app/src/job.rs

use std::path::{Path, PathBuf};

use analytics::PerformanceReport;
use anyhow::{Context, Result};
use app_config::types::{AppSettings, BacktestSettings};
use chrono::{DateTime, Utc};
use core_types::PriceSeries;
use optimizer::{GridSpec, OutOfSampleReport, ParameterSearch, TrainTestSplit};
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use strategies::{ParameterCombo, Rule};

// --- Structs for deserializing optimizer.toml ---

#[derive(Deserialize, Debug)]
pub struct OptimizerConfig {
    pub job: JobSettings,
    pub grid: GridSpec,
}

#[derive(Deserialize, Debug)]
pub struct JobSettings {
    pub name: String,
    /// CSV file with the bars to optimize on. `--data` overrides it.
    #[serde(default)]
    pub data: Option<PathBuf>,
    pub rule: Rule,
    /// Falls back to `backtest.train_fraction` from the main settings.
    #[serde(default)]
    pub train_fraction: Option<f64>,
}

// --- Public API for the Optimizer Module ---

pub fn load_optimizer_config(path: &Path) -> Result<OptimizerConfig> {
    let config = app_config::load_toml(path)?;
    Ok(config)
}

/// Sizes the global rayon pool. Zero leaves rayon's default in place.
pub fn configure_thread_pool(app_settings: &AppSettings) -> Result<()> {
    if app_settings.optimizer_threads == 0 {
        return Ok(());
    }
    tracing::info!(threads = app_settings.optimizer_threads, "Configuring Rayon thread pool.");
    ThreadPoolBuilder::new()
        .num_threads(app_settings.optimizer_threads)
        .build_global()
        .context("Failed to build Rayon thread pool")
}

/// Expands the grid, searches it on the train slice and validates the winner
/// on the test slice.
pub fn run_optimization(
    config: &OptimizerConfig,
    defaults: &BacktestSettings,
    prices: &PriceSeries,
) -> Result<OutOfSampleReport> {
    let grid = config.grid.expand().context("Invalid parameter grid")?;
    if grid.is_empty() {
        anyhow::bail!("The parameter grid is empty.");
    }
    let train_fraction = config.job.train_fraction.unwrap_or(defaults.train_fraction);
    tracing::info!(
        job = %config.job.name,
        rule = %config.job.rule,
        combos = grid.len(),
        valid = grid.valid_for(config.job.rule).len(),
        train_fraction,
        "Starting optimization."
    );

    let split = TrainTestSplit::by_fraction(prices, train_fraction)
        .context("Could not split the series into train and test slices")?;
    let search = ParameterSearch::new(config.job.rule).parallel(true);
    let report = split.run(&search, &grid)?;
    Ok(report)
}

/// A flat, serializable view of a finished job for `--json` output.
#[derive(Debug, Serialize)]
pub struct JobSummary<'a> {
    pub job: &'a str,
    pub rule: Rule,
    pub train_period: (DateTime<Utc>, DateTime<Utc>),
    pub test_period: (DateTime<Utc>, DateTime<Utc>),
    pub selected: ParameterCombo,
    pub train: &'a PerformanceReport,
    pub test: &'a PerformanceReport,
    pub buy_and_hold_test: &'a PerformanceReport,
    pub test_exposure: f64,
    pub ranked: Vec<RankedEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct RankedEntry<'a> {
    pub combo: ParameterCombo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<&'a PerformanceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> JobSummary<'a> {
    pub fn new(job: &'a JobSettings, report: &'a OutOfSampleReport) -> Self {
        Self {
            job: &job.name,
            rule: job.rule,
            train_period: report.train_period,
            test_period: report.test_period,
            selected: report.selected,
            train: &report.train_report,
            test: &report.test_report,
            buy_and_hold_test: &report.buy_and_hold_test,
            test_exposure: report.test_backtest.exposure(),
            ranked: report
                .train_results
                .iter()
                .map(|r| RankedEntry {
                    combo: r.combo,
                    report: r.report(),
                    error: r.outcome.as_ref().err().map(|e| e.to_string()),
                })
                .collect(),
        }
    }
}
