use chrono::{Duration, TimeZone, Utc};
use core_types::{Bar, PriceSeries};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Builds a daily series from closes; open/high/low equal the close.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let price = Decimal::from_f64(*c).unwrap();
            Bar {
                timestamp: start + Duration::days(i as i64),
                open: price,
                high: price,
                low: price,
                close: price,
            }
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// A trending series with two overlapping cycles, so different windows
/// produce clearly different results.
pub fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 * (1.0 + 0.002 * t) + 6.0 * (t / 9.0).sin() + 2.5 * (t / 3.0).sin()
        })
        .collect()
}
