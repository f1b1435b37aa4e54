pub mod error;
pub mod grid;
pub mod search;
pub mod train_test;

pub use error::{Error, Result};
pub use grid::{GridSpec, ParamValue, ParameterGrid};
pub use search::{ParameterSearch, SearchResult, evaluate_combo};
pub use train_test::{OutOfSampleReport, TrainTestSplit};
