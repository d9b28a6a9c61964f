//! Persistence error types.

use thiserror::Error;
use tide_position::PositionError;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("Unsupported state version: {0}")]
    UnsupportedVersion(u64),

    #[error("Invalid ledger: {0}")]
    InvalidLedger(#[from] PositionError),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
