use core_types::{PriceSeries, Result, Signal};

use crate::Strategy;
use crate::indicators::{ema, momentum};

/// EMA trend filter confirmed by positive momentum.
///
/// Long iff `EMA(short) > EMA(long)` and `close[t] / close[t - momentum] - 1 > 0`.
#[derive(Debug, Clone)]
pub struct EmaMomentum {
    short_span: usize,
    long_span: usize,
    momentum_window: usize,
}

impl EmaMomentum {
    pub fn new(short_span: usize, long_span: usize, momentum_window: usize) -> Self {
        Self {
            short_span,
            long_span,
            momentum_window,
        }
    }
}

impl Strategy for EmaMomentum {
    fn name(&self) -> &'static str {
        "EmaMomentum"
    }

    fn required_bars(&self) -> usize {
        self.momentum_window + 1
    }

    fn generate(&self, prices: &PriceSeries) -> Result<Vec<Signal>> {
        let closes = prices.closes();
        let fast = ema(closes, self.short_span)?;
        let slow = ema(closes, self.long_span)?;
        let mom = momentum(closes, self.momentum_window)?;

        Ok(fast
            .iter()
            .zip(&slow)
            .zip(&mom)
            .map(|triple| match triple {
                ((Some(f), Some(s)), Some(m)) => Signal::from(f > s && *m > 0.0),
                _ => Signal::Flat,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series_from_closes;

    #[test]
    fn flat_until_momentum_is_defined() {
        let closes: Vec<f64> = (0..20).map(|i| 10.0 + i as f64).collect();
        let signals = EmaMomentum::new(2, 5, 4)
            .generate(&series_from_closes(&closes))
            .unwrap();

        assert!(signals[..4].iter().all(|s| *s == Signal::Flat));
        assert!(signals[4..].iter().all(|s| *s == Signal::Long));
    }

    #[test]
    fn negative_momentum_vetoes_a_bullish_crossover() {
        // Long rally then a short dip: the fast EMA is still above the slow one
        // at the last bar, but the close is below the close three bars back.
        let mut closes: Vec<f64> = (0..30).map(|i| 100.0 + 2.0 * i as f64).collect();
        closes.extend([150.0, 149.0, 148.0]);
        let prices = series_from_closes(&closes);

        let fast = ema(prices.closes(), 3).unwrap();
        let slow = ema(prices.closes(), 12).unwrap();
        let last = closes.len() - 1;
        assert!(fast[last].unwrap() > slow[last].unwrap());

        let signals = EmaMomentum::new(3, 12, 3).generate(&prices).unwrap();
        assert_eq!(signals[last], Signal::Flat);
        assert_eq!(signals[29], Signal::Long);
    }
}
