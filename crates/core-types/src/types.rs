// In crates/core-types/src/types.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single OHLC price bar as supplied by the market data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

/// The position a rule asks for at a given bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Signal {
    /// No position. Also the value of any bar whose indicators are still warming up.
    #[default]
    Flat,
    Long,
}

impl Signal {
    /// The market exposure this signal stands for: 1.0 when long, 0.0 when flat.
    pub fn exposure(self) -> f64 {
        match self {
            Signal::Flat => 0.0,
            Signal::Long => 1.0,
        }
    }

    pub fn is_long(self) -> bool {
        matches!(self, Signal::Long)
    }
}

impl From<bool> for Signal {
    fn from(long: bool) -> Self {
        if long { Signal::Long } else { Signal::Flat }
    }
}
