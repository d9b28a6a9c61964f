//! Inventory ledger of open acquisition lots.
//!
//! Each instrument owns a price-ordered set of lots. Invariants:
//! - every stored lot quantity is strictly positive
//! - an instrument key exists iff it owns at least one lot
//!
//! Removal never clamps: asking for more than a lot holds is a bug in the
//! caller and would corrupt profit accounting, so it is reported as
//! `PositionError::InvalidState`.

use std::collections::BTreeMap;

use serde::Serialize;
use tide_core::{Price, Quantity, Symbol};
use tracing::trace;

use crate::error::{PositionError, PositionResult};

/// Lots of one instrument: acquisition price -> remaining quantity.
pub type LotMap = BTreeMap<Price, Quantity>;

/// A remembered acquisition not yet fully liquidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lot {
    pub price: Price,
    pub quantity: Quantity,
}

/// Open lots across all instruments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InventoryLedger {
    lots: BTreeMap<Symbol, LotMap>,
}

impl InventoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from decoded lots, rejecting anything that violates
    /// the ledger invariants.
    pub fn from_lots(lots: BTreeMap<Symbol, LotMap>) -> PositionResult<Self> {
        for (symbol, entries) in &lots {
            if entries.is_empty() {
                return Err(PositionError::InvalidState(format!(
                    "instrument {symbol} has no lots"
                )));
            }
            if let Some((price, qty)) = entries.iter().find(|(_, q)| !q.is_positive()) {
                return Err(PositionError::InvalidState(format!(
                    "lot {symbol}@{price} has non-positive quantity {qty}"
                )));
            }
        }
        Ok(Self { lots })
    }

    /// Record an acquisition, merging into an existing lot at the same price.
    pub fn add(&mut self, symbol: &Symbol, price: Price, quantity: Quantity) -> PositionResult<()> {
        if !quantity.is_positive() {
            return Err(PositionError::InvalidQuantity(format!(
                "cannot add {quantity} to {symbol}@{price}"
            )));
        }
        let held = self.quantity_at(symbol, price);
        let merged = held.checked_add(quantity).ok_or_else(|| {
            PositionError::InvalidQuantity(format!(
                "adding {quantity} to {symbol}@{price} overflows lot of {held}"
            ))
        })?;
        self.lots
            .entry(symbol.clone())
            .or_default()
            .insert(price, merged);
        trace!(%symbol, %price, %quantity, remaining = %merged, "lot added");
        Ok(())
    }

    /// Liquidate `quantity` from the lot bought at `price`.
    pub fn remove(
        &mut self,
        symbol: &Symbol,
        price: Price,
        quantity: Quantity,
    ) -> PositionResult<()> {
        if !quantity.is_positive() {
            return Err(PositionError::InvalidQuantity(format!(
                "cannot remove {quantity} from {symbol}@{price}"
            )));
        }
        let entries = self.lots.get_mut(symbol).ok_or_else(|| {
            PositionError::InvalidState(format!("instrument {symbol} not in ledger"))
        })?;
        let lot = entries.get_mut(&price).ok_or_else(|| {
            PositionError::InvalidState(format!("no lot for {symbol} at price {price}"))
        })?;
        if *lot < quantity {
            return Err(PositionError::InvalidState(format!(
                "lot {symbol}@{price} holds {lot}, cannot remove {quantity}"
            )));
        }

        *lot -= quantity;
        if lot.is_zero() {
            entries.remove(&price);
        }
        if entries.is_empty() {
            self.lots.remove(symbol);
        }
        trace!(%symbol, %price, %quantity, "lot reduced");
        Ok(())
    }

    /// Lots of an instrument, cheapest first.
    pub fn lots(&self, symbol: &Symbol) -> Vec<Lot> {
        self.lots
            .get(symbol)
            .map(|entries| {
                entries
                    .iter()
                    .map(|(price, quantity)| Lot {
                        price: *price,
                        quantity: *quantity,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Remaining quantity of the lot at `price` (0 if absent).
    pub fn quantity_at(&self, symbol: &Symbol, price: Price) -> Quantity {
        self.lots
            .get(symbol)
            .and_then(|entries| entries.get(&price))
            .copied()
            .unwrap_or_default()
    }

    /// Total open quantity of an instrument.
    pub fn open_quantity(&self, symbol: &Symbol) -> Quantity {
        self.lots
            .get(symbol)
            .map(|entries| {
                entries
                    .values()
                    .fold(Quantity::ZERO, |acc, q| acc.saturating_add(*q))
            })
            .unwrap_or_default()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.lots.contains_key(symbol)
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.lots.keys()
    }

    /// Raw view used by the state codec.
    pub fn as_map(&self) -> &BTreeMap<Symbol, LotMap> {
        &self.lots
    }
}
