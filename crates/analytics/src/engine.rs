use crate::types::{PerformanceReport, compound};

/// Trading periods per year used for every annualization.
///
/// Fixed regardless of instrument, risk-free rate pinned at zero.
pub const PERIODS_PER_YEAR: i32 = 252;

/// The engine responsible for calculating performance metrics from a return series.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyticsEngine;

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Calculates a full performance report from a return series.
    ///
    /// Undefined entries are skipped. Fewer than two valid returns yield
    /// [`PerformanceReport::degenerate`].
    pub fn evaluate(&self, returns: &[Option<f64>]) -> PerformanceReport {
        let valid: Vec<f64> = returns.iter().flatten().copied().collect();
        let n = valid.len();
        if n < 2 {
            return PerformanceReport::degenerate(n);
        }

        let periods = f64::from(PERIODS_PER_YEAR);

        // 1. Annualized return & volatility
        let mean = valid.iter().sum::<f64>() / n as f64;
        let variance = valid.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let annualized_return = (1.0 + mean).powi(PERIODS_PER_YEAR) - 1.0;
        let annualized_volatility = variance.sqrt() * periods.sqrt();

        // 2. Sharpe Ratio
        let sharpe_ratio = if annualized_volatility == 0.0 {
            0.0
        } else {
            annualized_return / annualized_volatility
        };

        // 3. Sortino Ratio (downside deviation against a zero target)
        let downside = (valid.iter().map(|r| r.min(0.0).powi(2)).sum::<f64>() / n as f64).sqrt()
            * periods.sqrt();
        let sortino_ratio = if downside == 0.0 {
            0.0
        } else {
            annualized_return / downside
        };

        // 4. Drawdown, measured against the 1.0 starting capital as well.
        let equity: Vec<f64> = std::iter::once(1.0).chain(compound(returns)).collect();
        let (max_drawdown, max_drawdown_duration) = drawdown(&equity);

        // 5. Return over max drawdown
        let return_over_maxdd = if max_drawdown == 0.0 {
            None
        } else {
            Some(annualized_return / max_drawdown.abs())
        };

        let total_return = equity.last().copied().unwrap_or(1.0) - 1.0;

        PerformanceReport {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown,
            return_over_maxdd,
            total_return,
            sortino_ratio,
            max_drawdown_duration,
            observations: n,
        }
    }
}

/// Returns the deepest `equity / running_peak - 1` (never positive) and the
/// longest stretch of consecutive points spent below the running peak.
fn drawdown(equity: &[f64]) -> (f64, usize) {
    let mut peak = f64::NEG_INFINITY;
    let mut max_drawdown = 0.0_f64;
    let mut current_duration = 0;
    let mut max_duration = 0;

    for &value in equity {
        peak = peak.max(value);
        let dd = value / peak - 1.0;
        max_drawdown = max_drawdown.min(dd);
        if value < peak {
            current_duration += 1;
            max_duration = max_duration.max(current_duration);
        } else {
            current_duration = 0;
        }
    }
    (max_drawdown, max_duration)
}
