// In crates/backtester/src/lib.rs

use analytics::EquityCurve;
use core_types::{Error, PriceSeries, Result, Signal};
use serde::Serialize;

/// Everything a single backtest produces. All series are aligned with the
/// price series they were computed from.
#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    /// The position held during each period: `signal[t - 1]`, flat at t = 0.
    pub positions: Vec<Signal>,
    /// `signal[t - 1] * return[t]`; undefined at t = 0.
    pub strategy_returns: Vec<Option<f64>>,
    pub strategy_equity: EquityCurve,
    /// Buy-and-hold benchmark compounded from the raw returns.
    pub market_equity: EquityCurve,
}

impl BacktestResult {
    /// Fraction of periods with a defined return during which the strategy was long.
    pub fn exposure(&self) -> f64 {
        let defined = self.strategy_returns.iter().filter(|r| r.is_some()).count();
        if defined == 0 {
            return 0.0;
        }
        let long = self
            .positions
            .iter()
            .zip(&self.strategy_returns)
            .filter(|(p, r)| p.is_long() && r.is_some())
            .count();
        long as f64 / defined as f64
    }

    /// Number of flat-to-long transitions in the held position.
    pub fn entries(&self) -> usize {
        self.positions
            .windows(2)
            .filter(|w| w[0] == Signal::Flat && w[1] == Signal::Long)
            .count()
    }
}

/// The engine for running vectorized historical backtests.
///
/// It is stateless: `run` is a pure function of the prices and the signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct Backtester;

impl Backtester {
    pub fn new() -> Self {
        Self
    }

    /// Applies `signals` to `prices` with a one-period lag.
    ///
    /// The decision taken on bar `t - 1` is the position held through bar `t`,
    /// so no bar's own close ever informs the position that earns its return.
    pub fn run(&self, prices: &PriceSeries, signals: &[Signal]) -> Result<BacktestResult> {
        if signals.len() != prices.len() {
            return Err(Error::SignalLengthMismatch {
                expected: prices.len(),
                actual: signals.len(),
            });
        }

        let positions: Vec<Signal> = std::iter::once(Signal::Flat)
            .chain(signals.iter().copied())
            .take(prices.len())
            .collect();

        let strategy_returns: Vec<Option<f64>> = prices
            .returns()
            .iter()
            .zip(&positions)
            .map(|(r, position)| r.map(|r| position.exposure() * r))
            .collect();

        let strategy_equity = EquityCurve::from_returns(prices.timestamps(), &strategy_returns);
        let market_equity = EquityCurve::from_returns(prices.timestamps(), prices.returns());

        tracing::debug!(
            bars = prices.len(),
            strategy_final = strategy_equity.final_value().unwrap_or(1.0),
            market_final = market_equity.final_value().unwrap_or(1.0),
            "Backtest finished."
        );

        Ok(BacktestResult {
            positions,
            strategy_returns,
            strategy_equity,
            market_equity,
        })
    }
}
