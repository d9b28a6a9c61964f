//! Diagnostics frames, prometheus metrics and structured logging for tide.
//!
//! - [`DiagnosticsLogger`]: per-tick trace collector emitting one size-capped frame
//! - [`compress`]: compact projections of the tick input and emitted orders
//! - [`Metrics`]: prometheus counters and gauges
//! - [`init_logging`]: tracing subscriber setup

pub mod compress;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod metrics;

pub use diagnostics::{DiagnosticsConfig, DiagnosticsFrame, DiagnosticsLogger};
pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, TelemetryConfig};
pub use metrics::Metrics;
