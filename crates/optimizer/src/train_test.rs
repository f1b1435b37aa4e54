//! Out-of-sample validation of a parameter search.
//!
//! Parameters are chosen on the train slice only and then measured once on a
//! later, disjoint test slice. Selecting and reporting on the same bars would
//! leak the future into the choice.

use analytics::{AnalyticsEngine, PerformanceReport};
use backtester::BacktestResult;
use chrono::{DateTime, Utc};
use core_types::PriceSeries;
use strategies::ParameterCombo;

use crate::error::{Error, Result};
use crate::search::{ParameterSearch, SearchResult, evaluate_combo};

/// A train slice followed by a test slice of the same series.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub train: PriceSeries,
    pub test: PriceSeries,
}

impl TrainTestSplit {
    /// Splits `prices` so the train slice holds `train_fraction` of the bars.
    pub fn by_fraction(prices: &PriceSeries, train_fraction: f64) -> Result<Self> {
        let (train, test) = prices.split_fraction(train_fraction)?;
        Ok(Self { train, test })
    }

    /// Splits `prices` at the first bar at or after `boundary`; that bar opens the test slice.
    pub fn at_timestamp(prices: &PriceSeries, boundary: DateTime<Utc>) -> Result<Self> {
        let index = prices
            .timestamps()
            .position(|ts| ts >= boundary)
            .unwrap_or(prices.len());
        let (train, test) = prices.split_at(index)?;
        Ok(Self { train, test })
    }

    /// Runs the search on the train slice, then evaluates the winner and a
    /// buy-and-hold benchmark on the test slice.
    pub fn run<'a>(
        &self,
        search: &ParameterSearch,
        grid: impl IntoIterator<Item = &'a ParameterCombo>,
    ) -> Result<OutOfSampleReport> {
        let train_results = search.search(&self.train, grid);

        let best = train_results
            .iter()
            .find(|r| r.sharpe().is_some())
            .ok_or(Error::NoViableCombo {
                evaluated: train_results.len(),
            })?;
        let selected = best.combo;
        let train_report = best
            .report()
            .cloned()
            .ok_or(Error::NoViableCombo {
                evaluated: train_results.len(),
            })?;

        let (test_backtest, test_report) = evaluate_combo(&self.test, &selected, search.rule())?;
        let buy_and_hold_test = AnalyticsEngine::new().evaluate(self.test.returns());

        tracing::info!(
            rule = %search.rule(),
            %selected,
            train_sharpe = train_report.sharpe_ratio,
            test_sharpe = test_report.sharpe_ratio,
            buy_and_hold_sharpe = buy_and_hold_test.sharpe_ratio,
            "Out-of-sample evaluation finished."
        );

        Ok(OutOfSampleReport {
            train_period: (self.train.first_timestamp(), self.train.last_timestamp()),
            test_period: (self.test.first_timestamp(), self.test.last_timestamp()),
            selected,
            train_report,
            test_report,
            buy_and_hold_test,
            test_backtest,
            train_results,
        })
    }
}

/// The result of the train/test protocol.
#[derive(Debug, Clone)]
pub struct OutOfSampleReport {
    pub train_period: (DateTime<Utc>, DateTime<Utc>),
    pub test_period: (DateTime<Utc>, DateTime<Utc>),
    /// The combo with the best train Sharpe ratio.
    pub selected: ParameterCombo,
    pub train_report: PerformanceReport,
    pub test_report: PerformanceReport,
    pub buy_and_hold_test: PerformanceReport,
    /// Signal, returns and equity curves of the selected combo on the test slice.
    pub test_backtest: BacktestResult,
    /// The ranked train search.
    pub train_results: Vec<SearchResult>,
}
