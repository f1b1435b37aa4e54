// In crates/optimizer/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] core_types::Error),

    #[error("No parameter combination produced a usable train report ({evaluated} evaluated)")]
    NoViableCombo { evaluated: usize },

    #[error("Invalid grid axis '{axis}': {reason}")]
    InvalidGrid { axis: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
