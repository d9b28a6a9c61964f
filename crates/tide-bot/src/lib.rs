//! Per-tick decision engine for tide.
//!
//! [`Trader::run`] is the whole decision cycle for one tick:
//! - decode the previous tick's state string
//! - dispatch every tradeable instrument to its configured policy
//! - encode the new state string
//! - flush one diagnostics frame

pub mod config;
pub mod error;
pub mod trader;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use trader::{TickOutput, Trader};
