use std::ops::Range;

use chrono::{DateTime, Utc};
use num_traits::cast::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::{Result, SeriesError};
use crate::types::Bar;

/// A validated, strictly time-ordered sequence of bars with its per-period returns.
///
/// Construction is the only place raw provider data is checked. Once built, a
/// series is immutable and every derived series (indicators, signals, equity)
/// is recomputed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
    closes: Vec<f64>,
    returns: Vec<Option<f64>>,
}

impl PriceSeries {
    /// Validates `bars` and derives `return[t] = close[t] / close[t-1] - 1`.
    ///
    /// Rejects empty input, duplicate or out-of-order timestamps, non-positive
    /// prices and bars whose high/low range does not contain open and close.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        if bars.is_empty() {
            return Err(SeriesError::Empty.into());
        }

        let mut closes = Vec::with_capacity(bars.len());
        for (index, bar) in bars.iter().enumerate() {
            validate_bar(index, bar)?;
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SeriesError::NonMonotonic { index }.into());
            }
            let close = bar
                .close
                .to_f64()
                .filter(|c| c.is_finite() && *c > 0.0)
                .ok_or(SeriesError::NonPositivePrice { index, field: "close" })?;
            closes.push(close);
        }

        let returns = derive_returns(&closes);
        Ok(Self { bars, closes, returns })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false: an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Close prices as floats, aligned with [`bars`](Self::bars).
    pub fn closes(&self) -> &[f64] {
        &self.closes
    }

    /// Per-period simple returns. Index 0 is always `None`.
    pub fn returns(&self) -> &[Option<f64>] {
        &self.returns
    }

    pub fn timestamps(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.bars.iter().map(|b| b.timestamp)
    }

    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.bars[0].timestamp
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.bars[self.bars.len() - 1].timestamp
    }

    /// A contiguous sub-series. Returns are re-derived, so the first bar of the
    /// window has no return and nothing outside the window is consulted.
    pub fn window(&self, range: Range<usize>) -> Result<Self> {
        if range.start > range.end || range.end > self.len() {
            return Err(SeriesError::OutOfBounds {
                start: range.start,
                end: range.end,
                len: self.len(),
            }
            .into());
        }
        if range.is_empty() {
            return Err(SeriesError::Empty.into());
        }

        let closes = self.closes[range.clone()].to_vec();
        let returns = derive_returns(&closes);
        Ok(Self {
            bars: self.bars[range].to_vec(),
            closes,
            returns,
        })
    }

    /// Splits into `[0, index)` and `[index, len)`. Both halves must be non-empty.
    pub fn split_at(&self, index: usize) -> Result<(Self, Self)> {
        if index == 0 || index >= self.len() {
            return Err(SeriesError::OutOfBounds {
                start: index,
                end: self.len(),
                len: self.len(),
            }
            .into());
        }
        Ok((self.window(0..index)?, self.window(index..self.len())?))
    }

    /// Splits so the leading part holds `fraction` of the bars (rounded).
    pub fn split_fraction(&self, fraction: f64) -> Result<(Self, Self)> {
        let index = if fraction.is_finite() && fraction > 0.0 {
            (self.len() as f64 * fraction).round() as usize
        } else {
            0
        };
        self.split_at(index)
    }
}

fn validate_bar(index: usize, bar: &Bar) -> Result<()> {
    for (field, price) in [
        ("open", bar.open),
        ("high", bar.high),
        ("low", bar.low),
        ("close", bar.close),
    ] {
        if price <= Decimal::ZERO {
            return Err(SeriesError::NonPositivePrice { index, field }.into());
        }
    }
    if bar.low > bar.high
        || bar.open > bar.high
        || bar.close > bar.high
        || bar.open < bar.low
        || bar.close < bar.low
    {
        return Err(SeriesError::InvalidRange { index }.into());
    }
    Ok(())
}

fn derive_returns(closes: &[f64]) -> Vec<Option<f64>> {
    std::iter::once(None)
        .chain(closes.windows(2).map(|w| Some(w[1] / w[0] - 1.0)))
        .take(closes.len())
        .collect()
}
