//! Order book snapshot for a single instrument.
//!
//! Sign convention: buy levels carry a positive quantity, sell levels carry
//! a negative quantity whose magnitude is the offered volume. The venue has
//! not always been consistent about the sell sign, so every constructor
//! (including deserialization) normalizes at the boundary and the rest of
//! the engine can rely on the convention.

use crate::{Price, Quantity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Book state used to decide whether an instrument participates in a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookState {
    /// Both sides have at least one level.
    Valid,
    /// No buy levels.
    NoBid,
    /// No sell levels.
    NoAsk,
    /// Both sides empty.
    Empty,
}

impl BookState {
    /// Check if this state allows trading decisions.
    pub fn is_tradeable(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl std::fmt::Display for BookState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Valid => write!(f, "VALID"),
            Self::NoBid => write!(f, "NO_BID"),
            Self::NoAsk => write!(f, "NO_ASK"),
            Self::Empty => write!(f, "EMPTY"),
        }
    }
}

/// Wire shape before sign normalization.
#[derive(Debug, Default, Deserialize)]
struct RawOrderDepth {
    #[serde(default)]
    buy_orders: BTreeMap<Price, Quantity>,
    #[serde(default)]
    sell_orders: BTreeMap<Price, Quantity>,
}

impl From<RawOrderDepth> for OrderDepth {
    fn from(raw: RawOrderDepth) -> Self {
        OrderDepth::new(raw.buy_orders, raw.sell_orders)
    }
}

/// Resting buy/sell interest for one instrument, keyed by price.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOrderDepth")]
pub struct OrderDepth {
    /// Price -> resting buy quantity (positive).
    pub buy_orders: BTreeMap<Price, Quantity>,
    /// Price -> resting sell quantity (negative).
    pub sell_orders: BTreeMap<Price, Quantity>,
}

impl OrderDepth {
    /// Build a depth, normalizing signs and dropping empty levels.
    pub fn new(
        buys: impl IntoIterator<Item = (Price, Quantity)>,
        sells: impl IntoIterator<Item = (Price, Quantity)>,
    ) -> Self {
        let buy_orders = buys
            .into_iter()
            .filter(|(_, q)| !q.is_zero())
            .map(|(p, q)| (p, q.abs()))
            .collect();
        let sell_orders = sells
            .into_iter()
            .filter(|(_, q)| !q.is_zero())
            .map(|(p, q)| (p, -q.abs()))
            .collect();
        Self {
            buy_orders,
            sell_orders,
        }
    }

    /// Convenience constructor from raw `(price, quantity)` pairs.
    pub fn from_pairs(buys: &[(i64, i64)], sells: &[(i64, i64)]) -> Self {
        Self::new(
            buys.iter().map(|&(p, q)| (Price(p), Quantity(q))),
            sells.iter().map(|&(p, q)| (Price(p), Quantity(q))),
        )
    }

    pub fn state(&self) -> BookState {
        match (self.buy_orders.is_empty(), self.sell_orders.is_empty()) {
            (false, false) => BookState::Valid,
            (true, false) => BookState::NoBid,
            (false, true) => BookState::NoAsk,
            (true, true) => BookState::Empty,
        }
    }

    /// Highest buy level.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.buy_orders.iter().next_back().map(|(p, q)| (*p, *q))
    }

    /// Lowest sell level (quantity reported as a positive magnitude).
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.sell_orders.iter().next().map(|(p, q)| (*p, q.abs()))
    }

    /// Buy levels, cheapest first, with positive quantities.
    pub fn bids_ascending(&self) -> impl DoubleEndedIterator<Item = (Price, Quantity)> + '_ {
        self.buy_orders.iter().map(|(p, q)| (*p, *q))
    }

    /// Sell levels, cheapest first, with positive (offered) quantities.
    pub fn asks_ascending(&self) -> impl DoubleEndedIterator<Item = (Price, Quantity)> + '_ {
        self.sell_orders.iter().map(|(p, q)| (*p, q.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sell_side_normalized_negative() {
        let depth = OrderDepth::from_pairs(&[(10, -2)], &[(12, 3), (13, -4)]);
        assert_eq!(depth.buy_orders[&Price(10)], Quantity(2));
        assert_eq!(depth.sell_orders[&Price(12)], Quantity(-3));
        assert_eq!(depth.sell_orders[&Price(13)], Quantity(-4));
    }

    #[test]
    fn test_zero_levels_dropped() {
        let depth = OrderDepth::from_pairs(&[(10, 0)], &[(12, 0)]);
        assert_eq!(depth.state(), BookState::Empty);
    }

    #[test]
    fn test_book_state() {
        assert_eq!(
            OrderDepth::from_pairs(&[(10, 1)], &[(11, -1)]).state(),
            BookState::Valid
        );
        assert_eq!(
            OrderDepth::from_pairs(&[], &[(11, -1)]).state(),
            BookState::NoBid
        );
        assert_eq!(
            OrderDepth::from_pairs(&[(10, 1)], &[]).state(),
            BookState::NoAsk
        );
        assert!(!BookState::NoAsk.is_tradeable());
    }

    #[test]
    fn test_best_levels() {
        let depth = OrderDepth::from_pairs(&[(8, 1), (10, 2)], &[(12, -3), (14, -1)]);
        assert_eq!(depth.best_bid(), Some((Price(10), Quantity(2))));
        assert_eq!(depth.best_ask(), Some((Price(12), Quantity(3))));
    }

    #[test]
    fn test_deserialize_normalizes_signs() {
        let json = r#"{"buy_orders":{"10":2,"8":1},"sell_orders":{"12":3}}"#;
        let depth: OrderDepth = serde_json::from_str(json).unwrap();
        assert_eq!(depth.sell_orders[&Price(12)], Quantity(-3));
        assert_eq!(depth.bids_ascending().next(), Some((Price(8), Quantity(1))));
    }
}
