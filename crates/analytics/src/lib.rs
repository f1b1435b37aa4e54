pub mod engine;
pub mod types;

pub use engine::{AnalyticsEngine, PERIODS_PER_YEAR};
pub use types::{EquityCurve, EquityPoint, PerformanceReport};
