use std::cmp::Ordering;

use analytics::{AnalyticsEngine, PerformanceReport};
use backtester::{BacktestResult, Backtester};
use core_types::{Error, PriceSeries};
use rayon::prelude::*;
use strategies::{ParameterCombo, Rule};

/// The outcome of evaluating one combo. Failures stay in the result set next
/// to the successes instead of aborting the search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub combo: ParameterCombo,
    pub outcome: Result<PerformanceReport, Error>,
}

impl SearchResult {
    pub fn report(&self) -> Option<&PerformanceReport> {
        self.outcome.as_ref().ok()
    }

    /// The Sharpe ratio, if the combo was evaluated and the report is not degenerate.
    pub fn sharpe(&self) -> Option<f64> {
        self.report()
            .map(|r| r.sharpe_ratio)
            .filter(|s| !s.is_nan())
    }

    fn tier(&self) -> u8 {
        match &self.outcome {
            Ok(report) if !report.sharpe_ratio.is_nan() => 0,
            Ok(_) => 1,
            Err(_) => 2,
        }
    }
}

/// Runs the full signal -> backtest -> evaluation pipeline for one combo.
pub fn evaluate_combo(
    prices: &PriceSeries,
    combo: &ParameterCombo,
    rule: Rule,
) -> Result<(BacktestResult, PerformanceReport), Error> {
    let signals = strategies::generate(prices, combo, rule)?;
    let backtest = Backtester::new().run(prices, &signals)?;
    let report = AnalyticsEngine::new().evaluate(&backtest.strategy_returns);
    Ok((backtest, report))
}

/// Grid search over the parameters of a single rule.
#[derive(Debug, Clone, Copy)]
pub struct ParameterSearch {
    rule: Rule,
    parallel: bool,
}

impl ParameterSearch {
    pub fn new(rule: Rule) -> Self {
        Self {
            rule,
            parallel: false,
        }
    }

    /// Evaluate combos on the rayon thread pool. Results are identical to a
    /// sequential run.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn rule(&self) -> Rule {
        self.rule
    }

    /// Evaluates every valid combo of `grid` on `prices`, ranked by Sharpe ratio.
    ///
    /// Combos that violate the window constraints are dropped silently.
    /// Ordering: evaluated combos by descending Sharpe, then degenerate
    /// reports, then failures. Ties keep grid order.
    pub fn search<'a>(
        &self,
        prices: &PriceSeries,
        grid: impl IntoIterator<Item = &'a ParameterCombo>,
    ) -> Vec<SearchResult> {
        let combos: Vec<ParameterCombo> = grid
            .into_iter()
            .filter(|c| c.is_valid_for(self.rule))
            .copied()
            .collect();

        let evaluate = |combo: &ParameterCombo| {
            let outcome = evaluate_combo(prices, combo, self.rule).map(|(_, report)| report);
            match &outcome {
                Ok(report) => tracing::debug!(
                    %combo,
                    sharpe = report.sharpe_ratio,
                    annualized_return = report.annualized_return,
                    max_drawdown = report.max_drawdown,
                    "Evaluated parameter combination."
                ),
                Err(e) => tracing::warn!(%combo, error = %e, "Parameter combination failed."),
            }
            SearchResult {
                combo: *combo,
                outcome,
            }
        };

        let mut results: Vec<SearchResult> = if self.parallel {
            combos.par_iter().map(evaluate).collect()
        } else {
            combos.iter().map(evaluate).collect()
        };
        rank(&mut results);

        tracing::info!(
            rule = %self.rule,
            evaluated = results.len(),
            failed = results.iter().filter(|r| r.outcome.is_err()).count(),
            best = ?results.first().and_then(SearchResult::sharpe),
            "Parameter search finished."
        );
        results
    }
}

/// Stable sort by descending Sharpe within the tiers described on
/// [`ParameterSearch::search`].
fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        a.tier().cmp(&b.tier()).then_with(|| match (a.sharpe(), b.sharpe()) {
            (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(short: usize, sharpe: f64) -> SearchResult {
        let mut report = PerformanceReport::degenerate(10);
        report.sharpe_ratio = sharpe;
        SearchResult {
            combo: ParameterCombo::new(short, 100, None),
            outcome: Ok(report),
        }
    }

    fn failed(short: usize) -> SearchResult {
        SearchResult {
            combo: ParameterCombo::new(short, 100, None),
            outcome: Err(Error::InsufficientHistory {
                required: 100,
                available: 10,
            }),
        }
    }

    #[test]
    fn rank_orders_by_sharpe_then_degenerate_then_failed() {
        let mut results = vec![
            failed(1),
            ok(2, f64::NAN),
            ok(3, 0.5),
            ok(4, 1.5),
            ok(5, -0.2),
        ];
        rank(&mut results);
        let order: Vec<usize> = results.iter().map(|r| r.combo.short_window).collect();
        assert_eq!(order, vec![4, 3, 5, 2, 1]);
    }

    #[test]
    fn rank_keeps_grid_order_on_ties() {
        let mut results = vec![ok(7, 1.0), ok(3, 2.0), ok(9, 1.0), ok(1, 1.0)];
        rank(&mut results);
        let order: Vec<usize> = results.iter().map(|r| r.combo.short_window).collect();
        assert_eq!(order, vec![3, 7, 9, 1]);
    }

    #[test]
    fn sharpe_hides_degenerate_reports() {
        assert_eq!(ok(1, f64::NAN).sharpe(), None);
        assert_eq!(failed(1).sharpe(), None);
        assert_eq!(ok(1, 0.75).sharpe(), Some(0.75));
    }
}
