use core_types::Result;

use crate::ema_momentum::EmaMomentum;
use crate::sma_crossover::SmaCrossover;
use crate::types::{ParameterCombo, Rule};
use crate::Strategy;

/// Creates the strategy instance for `rule`, rejecting combos that violate its
/// window constraints.
pub fn create_strategy(
    rule: Rule,
    combo: &ParameterCombo,
) -> Result<Box<dyn Strategy + Send + Sync>> {
    combo.validate(rule)?;

    let strategy: Box<dyn Strategy + Send + Sync> = match rule {
        Rule::SmaCross => Box::new(SmaCrossover::new(combo.short_window, combo.long_window)),
        Rule::EmaMomentum => Box::new(EmaMomentum::new(
            combo.short_window,
            combo.long_window,
            // `validate` guarantees the momentum window for this rule.
            combo.momentum_window.unwrap_or_default(),
        )),
    };
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Error;

    #[test]
    fn builds_each_rule() {
        let sma = create_strategy(Rule::SmaCross, &ParameterCombo::new(20, 50, None)).unwrap();
        assert_eq!(sma.name(), "SmaCrossover");
        assert_eq!(sma.required_bars(), 50);

        let ema =
            create_strategy(Rule::EmaMomentum, &ParameterCombo::new(12, 26, Some(10))).unwrap();
        assert_eq!(ema.name(), "EmaMomentum");
        assert_eq!(ema.required_bars(), 11);
    }

    #[test]
    fn rejects_invalid_combo() {
        let err = create_strategy(Rule::SmaCross, &ParameterCombo::new(50, 20, None)).err();
        assert!(matches!(err, Some(Error::InvalidCombo(_))));
    }
}
