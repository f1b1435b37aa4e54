// In crates/analytics/src/types.rs

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A struct to hold a point in an equity curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EquityPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Growth of one unit of capital, one point per bar.
///
/// Leading bars with an undefined return sit at 1.0; afterwards
/// `equity[t] = equity[t-1] * (1 + r[t])`, with undefined returns carrying the
/// previous value forward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityCurve {
    pub points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// Compounds `returns` onto `timestamps`. Both slices must be aligned; any
    /// excess on either side is ignored.
    pub fn from_returns(
        timestamps: impl IntoIterator<Item = DateTime<Utc>>,
        returns: &[Option<f64>],
    ) -> Self {
        let points = timestamps
            .into_iter()
            .zip(compound(returns))
            .map(|(timestamp, value)| EquityPoint { timestamp, value })
            .collect();
        Self { points }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn final_value(&self) -> Option<f64> {
        self.points.last().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Per-period returns implied by consecutive equity values.
    pub fn implied_returns(&self) -> Vec<Option<f64>> {
        std::iter::once(None)
            .chain(self.points.windows(2).map(|w| Some(w[1].value / w[0].value - 1.0)))
            .take(self.points.len())
            .collect()
    }
}

/// Cumulative product of `1 + r`, starting from 1.0.
pub(crate) fn compound(returns: &[Option<f64>]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0_f64, |equity, r| {
            if let Some(r) = r {
                *equity *= 1.0 + r;
            }
            Some(*equity)
        })
        .collect()
}

/// Risk-adjusted performance of a single return series.
///
/// A report built from fewer than two valid returns is degenerate: every
/// float is NaN and `return_over_maxdd` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceReport {
    /// `(1 + mean)^252 - 1`.
    pub annualized_return: f64,
    /// Sample standard deviation scaled by `sqrt(252)`.
    pub annualized_volatility: f64,
    /// Annualized return over annualized volatility; 0 when volatility is 0.
    pub sharpe_ratio: f64,
    /// Worst peak-to-trough decline as a non-positive fraction.
    pub max_drawdown: f64,
    /// Annualized return over `|max_drawdown|`; `None` when there was no drawdown.
    pub return_over_maxdd: Option<f64>,

    pub total_return: f64,
    pub sortino_ratio: f64,
    /// Longest run of periods spent below a previous equity peak.
    pub max_drawdown_duration: usize,
    /// Number of defined returns the report was computed from.
    pub observations: usize,
}

impl PerformanceReport {
    /// The report for a series too short to measure.
    pub fn degenerate(observations: usize) -> Self {
        Self {
            annualized_return: f64::NAN,
            annualized_volatility: f64::NAN,
            sharpe_ratio: f64::NAN,
            max_drawdown: f64::NAN,
            return_over_maxdd: None,
            total_return: f64::NAN,
            sortino_ratio: f64::NAN,
            max_drawdown_duration: 0,
            observations,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.sharpe_ratio.is_nan()
    }
}
