//! Per-tick input supplied by the venue.
//!
//! Only `order_depths`, `position` and `trader_data` drive decisions.
//! Listings, trades and observations are carried so the diagnostics
//! projection can echo them.

use crate::error::Result;
use crate::{Order, OrderDepth, Price, Quantity, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Orders emitted for one tick, grouped by instrument.
pub type OrderMap = BTreeMap<Symbol, Vec<Order>>;

/// Listed instrument metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub symbol: Symbol,
    pub product: String,
    pub denomination: String,
}

/// A trade printed by the venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: Symbol,
    pub price: Price,
    pub quantity: Quantity,
    #[serde(default)]
    pub buyer: Option<String>,
    #[serde(default)]
    pub seller: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
}

/// Conversion venue observation for a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionObservation {
    pub bid_price: f64,
    pub ask_price: f64,
    pub transport_fees: f64,
    pub export_tariff: f64,
    pub import_tariff: f64,
    #[serde(default)]
    pub sugar_price: f64,
    #[serde(default)]
    pub sunlight_index: f64,
}

/// Auxiliary market observations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(default)]
    pub plain_value_observations: BTreeMap<String, i64>,
    #[serde(default)]
    pub conversion_observations: BTreeMap<String, ConversionObservation>,
}

/// Everything the venue hands over for one tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingState {
    #[serde(default)]
    pub timestamp: i64,
    /// Opaque state string returned by the previous tick.
    #[serde(default, alias = "traderData")]
    pub trader_data: String,
    #[serde(default)]
    pub listings: BTreeMap<Symbol, Listing>,
    #[serde(default)]
    pub order_depths: BTreeMap<Symbol, OrderDepth>,
    #[serde(default)]
    pub own_trades: BTreeMap<Symbol, Vec<Trade>>,
    #[serde(default)]
    pub market_trades: BTreeMap<Symbol, Vec<Trade>>,
    /// Current signed inventory per instrument.
    #[serde(default)]
    pub position: BTreeMap<Symbol, Quantity>,
    #[serde(default)]
    pub observations: Observation,
}

impl TradingState {
    /// Parse one tick from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Current position, 0 if the venue reported none.
    pub fn position_of(&self, symbol: &Symbol) -> Quantity {
        self.position.get(symbol).copied().unwrap_or_default()
    }
}
