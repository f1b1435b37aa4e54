// In crates/core-types/src/error.rs

use thiserror::Error;

/// Errors shared by every stage of the backtesting pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid price series: {0}")]
    InvalidSeries(#[from] SeriesError),

    #[error("Invalid parameter combination: {0}")]
    InvalidCombo(String),

    #[error("Insufficient history: need {required} bars, have {available}")]
    InsufficientHistory { required: usize, available: usize },

    #[error("Signal series has {actual} points but the price series has {expected}")]
    SignalLengthMismatch { expected: usize, actual: usize },
}

/// The reasons a raw bar sequence is rejected at ingestion.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("series is empty")]
    Empty,

    #[error("timestamp at index {index} is not after its predecessor")]
    NonMonotonic { index: usize },

    #[error("non-positive or non-finite {field} price at index {index}")]
    NonPositivePrice { index: usize, field: &'static str },

    #[error("high/low range at index {index} does not contain open and close")]
    InvalidRange { index: usize },

    #[error("slice {start}..{end} is out of bounds for {len} bars")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
