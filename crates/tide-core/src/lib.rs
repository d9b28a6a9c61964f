//! Core domain types for the tide trading engine.
//!
//! This crate provides the types shared by every other crate:
//! - `Symbol`: Instrument identifier
//! - `Price`, `Quantity`: Integer tick/lot types
//! - `OrderDepth`: Resting buy/sell interest for one instrument
//! - `Order`, `OrderSide`: Orders emitted by a tick
//! - `TradingState`: Per-tick input supplied by the venue

pub mod book;
pub mod error;
pub mod order;
pub mod tick;
pub mod units;

pub use book::{BookState, OrderDepth};
pub use error::{CoreError, Result};
pub use order::{Order, OrderSide};
pub use tick::{ConversionObservation, Listing, Observation, OrderMap, Trade, TradingState};
pub use units::{Price, Quantity, Symbol};
