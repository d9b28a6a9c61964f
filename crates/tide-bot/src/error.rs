//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Position error: {0}")]
    Position(#[from] tide_position::PositionError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] tide_persistence::PersistenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] tide_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;
