// In crates/strategies/src/types.rs

use std::fmt;
use std::str::FromStr;

use core_types::{Error, Result};
use serde::{Deserialize, Serialize};

/// The closed set of signal rules the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Long while SMA(short) is above SMA(long).
    SmaCross,
    /// Long while EMA(short) is above EMA(long) and momentum is positive.
    EmaMomentum,
}

impl Rule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::SmaCross => "sma_cross",
            Rule::EmaMomentum => "ema_momentum",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "sma_cross" => Ok(Rule::SmaCross),
            "ema_momentum" => Ok(Rule::EmaMomentum),
            other => Err(format!(
                "unknown rule '{other}', expected 'sma_cross' or 'ema_momentum'"
            )),
        }
    }
}

/// One point of the parameter grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterCombo {
    pub short_window: usize,
    pub long_window: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum_window: Option<usize>,
}

impl ParameterCombo {
    pub fn new(short_window: usize, long_window: usize, momentum_window: Option<usize>) -> Self {
        Self {
            short_window,
            long_window,
            momentum_window,
        }
    }

    /// Checks the window constraints `rule` depends on.
    ///
    /// Windows must be positive and `short_window < long_window`. The
    /// momentum window is required by [`Rule::EmaMomentum`] and ignored by
    /// [`Rule::SmaCross`].
    pub fn validate(&self, rule: Rule) -> Result<()> {
        if self.short_window == 0 || self.long_window == 0 {
            return Err(Error::InvalidCombo(format!(
                "{self}: window sizes must be positive"
            )));
        }
        if self.short_window >= self.long_window {
            return Err(Error::InvalidCombo(format!(
                "{self}: short window must be smaller than long window"
            )));
        }
        if rule == Rule::EmaMomentum {
            match self.momentum_window {
                None => {
                    return Err(Error::InvalidCombo(format!(
                        "{self}: rule {rule} needs a momentum window"
                    )));
                }
                Some(0) => {
                    return Err(Error::InvalidCombo(format!(
                        "{self}: momentum window must be positive"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn is_valid_for(&self, rule: Rule) -> bool {
        self.validate(rule).is_ok()
    }
}

impl fmt::Display for ParameterCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "short={} long={}", self.short_window, self.long_window)?;
        if let Some(momentum) = self.momentum_window {
            write!(f, " momentum={momentum}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_parses_both_spellings() {
        assert_eq!("sma-cross".parse::<Rule>(), Ok(Rule::SmaCross));
        assert_eq!("EMA_MOMENTUM".parse::<Rule>(), Ok(Rule::EmaMomentum));
        assert!("rsi".parse::<Rule>().is_err());
    }

    #[test]
    fn combo_validation() {
        assert!(ParameterCombo::new(20, 50, None).is_valid_for(Rule::SmaCross));
        assert!(!ParameterCombo::new(50, 20, None).is_valid_for(Rule::SmaCross));
        assert!(!ParameterCombo::new(0, 20, None).is_valid_for(Rule::SmaCross));
        assert!(!ParameterCombo::new(10, 20, None).is_valid_for(Rule::EmaMomentum));
        assert!(!ParameterCombo::new(10, 20, Some(0)).is_valid_for(Rule::EmaMomentum));
        assert!(ParameterCombo::new(10, 20, Some(30)).is_valid_for(Rule::EmaMomentum));
    }

    #[test]
    fn combo_display_includes_momentum_only_when_set() {
        assert_eq!(ParameterCombo::new(5, 10, None).to_string(), "short=5 long=10");
        assert_eq!(
            ParameterCombo::new(5, 10, Some(3)).to_string(),
            "short=5 long=10 momentum=3"
        );
    }
}
