// In crates/strategies/src/sma_crossover.rs

use core_types::{PriceSeries, Result, Signal};

use crate::Strategy;
use crate::indicators::sma;

/// Long while the short simple moving average sits above the long one.
#[derive(Debug, Clone)]
pub struct SmaCrossover {
    short_window: usize,
    long_window: usize,
}

impl SmaCrossover {
    /// Creates a new `SmaCrossover`. Windows are validated by the factory.
    pub fn new(short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
        }
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &'static str {
        "SmaCrossover"
    }

    fn required_bars(&self) -> usize {
        self.long_window
    }

    fn generate(&self, prices: &PriceSeries) -> Result<Vec<Signal>> {
        let fast = sma(prices.closes(), self.short_window)?;
        let slow = sma(prices.closes(), self.long_window)?;

        Ok(fast
            .iter()
            .zip(&slow)
            .map(|pair| match pair {
                (Some(f), Some(s)) => Signal::from(f > s),
                // Warm-up: no position until both averages exist.
                _ => Signal::Flat,
            })
            .collect())
    }
}
