//! Position error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("Invalid ledger state: {0}")]
    InvalidState(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
}

pub type PositionResult<T> = Result<T, PositionError>;
