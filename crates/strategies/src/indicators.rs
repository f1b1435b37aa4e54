//! Indicator series over close prices.
//!
//! Every function returns one value per input point. Points without enough
//! history are `None` rather than a partial estimate.

use core_types::{Error, Result};
use ta::Next;
use ta::indicators::ExponentialMovingAverage as Ema;

/// A value per bar, undefined during the warm-up prefix.
pub type IndicatorSeries = Vec<Option<f64>>;

/// Arithmetic mean of the trailing `window` closes.
///
/// The first `window - 1` points are undefined. Each window is averaged on its
/// own, as deviations from its latest close, so a flat run of prices yields
/// exactly that price for every window length.
pub fn sma(closes: &[f64], window: usize) -> Result<IndicatorSeries> {
    if window == 0 {
        return Err(invalid_window("SMA", window, "window must be positive"));
    }
    let warm_up = (window - 1).min(closes.len());
    Ok(std::iter::repeat_n(None, warm_up)
        .chain(closes.windows(window).map(|w| {
            let last = w[w.len() - 1];
            Some(last + w.iter().map(|c| c - last).sum::<f64>() / window as f64)
        }))
        .collect())
}

/// Exponentially weighted mean with smoothing `2 / (span + 1)`.
///
/// Seeded with the first close and without bias adjustment, so every point is
/// defined.
pub fn ema(closes: &[f64], span: usize) -> Result<IndicatorSeries> {
    let mut indicator = Ema::new(span).map_err(|e| invalid_window("EMA", span, e))?;
    Ok(closes.iter().map(|close| Some(indicator.next(*close))).collect())
}

/// `close[t] / close[t - window] - 1`. The first `window` points are undefined.
pub fn momentum(closes: &[f64], window: usize) -> Result<IndicatorSeries> {
    if window == 0 {
        return Err(Error::InvalidCombo(
            "momentum window must be positive".to_string(),
        ));
    }
    Ok((0..closes.len())
        .map(|i| (i >= window).then(|| closes[i] / closes[i - window] - 1.0))
        .collect())
}

fn invalid_window(indicator: &str, window: usize, err: impl std::fmt::Debug) -> Error {
    Error::InvalidCombo(format!("{indicator} window {window}: {err:?}"))
}
