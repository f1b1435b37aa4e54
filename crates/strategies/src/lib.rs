use core_types::{Error, PriceSeries, Result, Signal};

pub mod ema_momentum;
pub mod factory;
pub mod indicators;
pub mod sma_crossover;
pub mod types;

pub use factory::create_strategy;
pub use types::{ParameterCombo, Rule};

/// The universal interface for a signal rule.
///
/// A strategy turns a whole price series into a position signal aligned with
/// its bars. It holds only its parameters, so the same instance can be applied
/// to any number of series (train and test slices alike).
pub trait Strategy {
    /// The name of the strategy.
    fn name(&self) -> &'static str;

    /// Minimum number of bars needed for at least one defined signal.
    fn required_bars(&self) -> usize;

    /// One signal per bar. Bars whose indicators are still undefined are `Flat`.
    fn generate(&self, prices: &PriceSeries) -> Result<Vec<Signal>>;
}

/// Validates `combo` for `rule`, builds the matching strategy and runs it.
///
/// Fails with [`Error::InvalidCombo`] for malformed windows and with
/// [`Error::InsufficientHistory`] when the series is too short to yield a
/// single defined signal.
pub fn generate(prices: &PriceSeries, combo: &ParameterCombo, rule: Rule) -> Result<Vec<Signal>> {
    let strategy = create_strategy(rule, combo)?;
    let required = strategy.required_bars();
    if prices.len() < required {
        return Err(Error::InsufficientHistory {
            required,
            available: prices.len(),
        });
    }
    let signals = strategy.generate(prices)?;
    tracing::trace!(
        strategy = strategy.name(),
        %combo,
        long_bars = signals.iter().filter(|s| s.is_long()).count(),
        "Generated signal series."
    );
    Ok(signals)
}
