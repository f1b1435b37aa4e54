// In app/src/data.rs

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use core_types::{Bar, PriceSeries};
use rust_decimal::Decimal;
use serde::Deserialize;

/// One row of a daily OHLC file. Extra columns (volume, adjusted close) are ignored.
#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(
        alias = "Date",
        alias = "date",
        alias = "Timestamp",
        alias = "Datetime",
        alias = "datetime"
    )]
    timestamp: String,
    #[serde(alias = "Open")]
    open: Decimal,
    #[serde(alias = "High")]
    high: Decimal,
    #[serde(alias = "Low")]
    low: Decimal,
    #[serde(alias = "Close")]
    close: Decimal,
}

/// Reads bars from a CSV file with a header row, in file order.
///
/// Rows are not sorted or de-duplicated here; [`PriceSeries::new`] rejects
/// files that are not strictly increasing in time.
pub fn read_bars(path: &Path) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open price file {}", path.display()))?;

    let mut bars = Vec::new();
    for (row, record) in reader.deserialize::<CsvBar>().enumerate() {
        // Header is line 1.
        let line = row + 2;
        let record = record.with_context(|| format!("Malformed row at line {line}"))?;
        let timestamp = parse_timestamp(&record.timestamp)
            .with_context(|| format!("Bad timestamp at line {line}"))?;
        bars.push(Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
        });
    }
    Ok(bars)
}

/// Reads and validates a price series.
pub fn load_series(path: &Path) -> Result<PriceSeries> {
    let bars = read_bars(path)?;
    let series = PriceSeries::new(bars)
        .with_context(|| format!("Invalid price data in {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        bars = series.len(),
        from = %series.first_timestamp(),
        to = %series.last_timestamp(),
        "Loaded price series."
    );
    Ok(series)
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339. Dates without a
/// zone are taken as UTC.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| anyhow!("Unrecognized timestamp '{raw}': {e}"))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow!("Unrecognized timestamp '{raw}'"))?;
    Ok(Utc.from_utc_datetime(&midnight))
}

/// Descriptive statistics of a loaded series, printed by `inspect`.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SeriesSummary {
    pub bars: usize,
    pub first: DateTime<Utc>,
    pub last: DateTime<Utc>,
    pub first_close: f64,
    pub last_close: f64,
    pub min_close: f64,
    pub max_close: f64,
    pub mean_return: f64,
    /// Largest calendar gap between consecutive bars, in days.
    pub max_gap_days: i64,
}

impl SeriesSummary {
    pub fn of(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let defined: Vec<f64> = series.returns().iter().flatten().copied().collect();
        let mean_return = if defined.is_empty() {
            f64::NAN
        } else {
            defined.iter().sum::<f64>() / defined.len() as f64
        };
        let timestamps: Vec<DateTime<Utc>> = series.timestamps().collect();
        let max_gap_days = timestamps
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days())
            .max()
            .unwrap_or(0);

        Self {
            bars: series.len(),
            first: series.first_timestamp(),
            last: series.last_timestamp(),
            first_close: closes[0],
            last_close: closes[closes.len() - 1],
            min_close: closes.iter().copied().fold(f64::INFINITY, f64::min),
            max_close: closes.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_return,
            max_gap_days,
        }
    }
}
