// In app/src/main.rs

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use analytics::{AnalyticsEngine, PerformanceReport};
use anyhow::{Context, Result};
use app_config::Settings;
use clap::{Parser, Subcommand};
use optimizer::{OutOfSampleReport, evaluate_combo};
use serde::Serialize;
use strategies::{ParameterCombo, Rule};
use tracing_subscriber::prelude::*;

mod data;
mod job;

use crate::data::SeriesSummary;
use crate::job::{
    JobSummary, OptimizerConfig, configure_thread_pool, load_optimizer_config, run_optimization,
};

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Backtests long/flat moving-average rules on daily bars and tunes their windows."
)]
struct Cli {
    /// Overrides `app.log_level` from the settings.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Loads a price file and prints a summary of it.
    Inspect {
        /// CSV file with date, open, high, low, close columns.
        #[arg(short, long)]
        data: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Runs a single backtest. Unset parameters come from the `[backtest]` settings.
    Backtest {
        #[arg(short, long)]
        data: PathBuf,

        /// `sma-cross` or `ema-momentum`.
        #[arg(long)]
        rule: Option<Rule>,

        #[arg(long)]
        short: Option<usize>,

        #[arg(long)]
        long: Option<usize>,

        #[arg(long)]
        momentum: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Runs a parameter search with out-of-sample validation.
    Optimize {
        /// The optimization job description.
        #[arg(short, long, default_value = "config/optimizer.toml")]
        config: PathBuf,

        /// Overrides `job.data` from the job file.
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Number of ranked train results to print.
        #[arg(long, default_value_t = 5)]
        top: usize,

        #[arg(long)]
        json: bool,
    },
}

// --- Main Application Entry Point ---

fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = app_config::load_settings().context("Failed to load settings from config/")?;

    let level_name = cli.log_level.as_deref().unwrap_or(&settings.app.log_level);
    let level = tracing::Level::from_str(level_name)
        .with_context(|| format!("Unknown log level '{level_name}'"))?;
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::info!(environment = %settings.app.environment, "Starting application");

    match cli.command {
        Commands::Inspect { data, json } => handle_inspect(data, json)?,
        Commands::Backtest {
            data,
            rule,
            short,
            long,
            momentum,
            json,
        } => handle_backtest(&settings, data, rule, short, long, momentum, json)?,
        Commands::Optimize {
            config,
            data,
            top,
            json,
        } => handle_optimize(&settings, config, data, top, json)?,
    }

    Ok(())
}

/// Handles the logic for the `inspect` subcommand.
fn handle_inspect(path: PathBuf, json: bool) -> Result<()> {
    let series = data::load_series(&path)?;
    let summary = SeriesSummary::of(&series);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n--- {} ---", path.display());
    println!("Bars:        {}", summary.bars);
    println!("Period:      {} .. {}", summary.first.date_naive(), summary.last.date_naive());
    println!("Close:       {:.4} -> {:.4}", summary.first_close, summary.last_close);
    println!("Range:       {:.4} .. {:.4}", summary.min_close, summary.max_close);
    println!("Mean return: {:.6}", summary.mean_return);
    println!("Largest gap: {} days", summary.max_gap_days);
    Ok(())
}

#[derive(Serialize)]
struct BacktestSummary<'a> {
    rule: Rule,
    combo: ParameterCombo,
    strategy: &'a PerformanceReport,
    buy_and_hold: &'a PerformanceReport,
    exposure: f64,
    entries: usize,
    final_equity: Option<f64>,
}

/// Handles the logic for the `backtest` subcommand.
fn handle_backtest(
    settings: &Settings,
    path: PathBuf,
    rule: Option<Rule>,
    short: Option<usize>,
    long: Option<usize>,
    momentum: Option<usize>,
    json: bool,
) -> Result<()> {
    let defaults = &settings.backtest;
    let rule = rule.unwrap_or(defaults.rule);
    let combo = ParameterCombo::new(
        short.unwrap_or(defaults.short_window),
        long.unwrap_or(defaults.long_window),
        momentum.or(defaults.momentum_window),
    );

    let series = data::load_series(&path)?;
    let (backtest, report) = evaluate_combo(&series, &combo, rule)
        .with_context(|| format!("Backtest of {rule} ({combo}) failed"))?;
    let buy_and_hold = AnalyticsEngine::new().evaluate(series.returns());

    tracing::info!(
        %rule,
        %combo,
        sharpe = report.sharpe_ratio,
        entries = backtest.entries(),
        "Backtest complete."
    );

    if json {
        let summary = BacktestSummary {
            rule,
            combo,
            strategy: &report,
            buy_and_hold: &buy_and_hold,
            exposure: backtest.exposure(),
            entries: backtest.entries(),
            final_equity: backtest.strategy_equity.final_value(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("\n--- Backtest: {rule} ({combo}) ---");
    print_report("Strategy", &report);
    print_report("Buy & hold", &buy_and_hold);
    println!(
        "Exposure: {:.1}% | Entries: {} | Final equity: {:.4}",
        backtest.exposure() * 100.0,
        backtest.entries(),
        backtest.strategy_equity.final_value().unwrap_or(1.0)
    );
    Ok(())
}

/// Handles the logic for the `optimize` subcommand.
fn handle_optimize(
    settings: &Settings,
    config_path: PathBuf,
    data_override: Option<PathBuf>,
    top: usize,
    json: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let optimizer_config: OptimizerConfig = load_optimizer_config(&config_path)?;
    let data_path = data_override
        .or_else(|| optimizer_config.job.data.clone())
        .context("No price data: pass --data or set job.data in the optimizer config")?;

    configure_thread_pool(&settings.app)?;
    let series = data::load_series(&data_path)?;
    let report = run_optimization(&optimizer_config, &settings.backtest, &series)?;

    if json {
        let summary = JobSummary::new(&optimizer_config.job, &report);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_optimization_report(&optimizer_config.job.name, &report, top);
    }

    tracing::info!(duration = ?start_time.elapsed(), "Optimization job finished.");
    Ok(())
}

fn print_report(label: &str, report: &PerformanceReport) {
    let ratio = report
        .return_over_maxdd
        .map(|r| format!("{r:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "  {label:<10} Return: {:>7.2}% | Vol: {:>6.2}% | Sharpe: {:>5.2} | Sortino: {:>5.2}",
        report.annualized_return * 100.0,
        report.annualized_volatility * 100.0,
        report.sharpe_ratio,
        report.sortino_ratio,
    );
    println!(
        "  {:<10} Max DD: {:>7.2}% | Ret/DD: {ratio}",
        "",
        report.max_drawdown * 100.0,
    );
}

/// Helper function to print the final optimization summary.
fn print_optimization_report(job: &str, report: &OutOfSampleReport, top: usize) {
    println!("\n--- Optimization Job '{job}' Complete ---");
    println!(
        "Train: {} .. {} | Test: {} .. {}",
        report.train_period.0.date_naive(),
        report.train_period.1.date_naive(),
        report.test_period.0.date_naive(),
        report.test_period.1.date_naive(),
    );
    println!("---------------------------------");
    println!("Top {top} Parameter Sets by Train Sharpe:");
    println!("---------------------------------");

    for (i, result) in report.train_results.iter().take(top).enumerate() {
        match &result.outcome {
            Ok(r) => println!(
                "[Rank {}] {} | Sharpe: {:.2} | Return: {:.2}% | Max DD: {:.2}%",
                i + 1,
                result.combo,
                r.sharpe_ratio,
                r.annualized_return * 100.0,
                r.max_drawdown * 100.0
            ),
            Err(e) => println!("[Rank {}] {} | failed: {e}", i + 1, result.combo),
        }
    }
    let failed = report.train_results.iter().filter(|r| r.outcome.is_err()).count();
    if failed > 0 {
        println!("({failed} of {} combinations failed)", report.train_results.len());
    }

    println!("\n---------------------------------");
    println!("Selected: {}", report.selected);
    print_report("Train", &report.train_report);
    print_report("Test", &report.test_report);
    print_report("B&H test", &report.buy_and_hold_test);
}
