//! Lot ledger and position limits for tide.
//!
//! # Key Components
//!
//! - [`InventoryLedger`]: Open acquisition lots per instrument, keyed by price
//! - [`Lot`]: One remembered acquisition not yet liquidated
//! - [`PositionBudget`]: Per-tick projection of exposure against an absolute limit

pub mod budget;
pub mod error;
pub mod ledger;

pub use budget::PositionBudget;
pub use error::{PositionError, PositionResult};
pub use ledger::{InventoryLedger, Lot, LotMap};
