//! Price estimators over a book snapshot.
//!
//! Book values come straight from the venue, so every estimator uses checked
//! arithmetic and reports an unrepresentable result as `None`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tide_core::OrderDepth;

/// Fair-value estimator a policy quotes or takes around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Estimator {
    /// Full-depth VWAP, see [`expected_price`].
    #[default]
    Expected,
    /// Best bid / best ask midpoint.
    Mid,
    /// Top-of-book micro-price.
    WeightedMid,
}

impl Estimator {
    pub fn estimate(&self, depth: &OrderDepth) -> Option<Decimal> {
        match self {
            Self::Expected => expected_price(depth),
            Self::Mid => mid_price(depth),
            Self::WeightedMid => weighted_mid(depth),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expected => "expected",
            Self::Mid => "mid",
            Self::WeightedMid => "weighted_mid",
        }
    }
}

/// Volume-weighted average price over every level on both sides.
///
/// Returns `Some(0)` when the book carries no volume and `None` when the
/// book's notional does not fit a `Decimal`.
pub fn expected_price(depth: &OrderDepth) -> Option<Decimal> {
    let mut notional: i128 = 0;
    let mut volume: i128 = 0;
    for (price, qty) in depth.bids_ascending().chain(depth.asks_ascending()) {
        let qty = i128::from(qty.inner());
        notional = notional.checked_add(i128::from(price.inner()) * qty)?;
        volume = volume.checked_add(qty)?;
    }
    if volume == 0 {
        return Some(Decimal::ZERO);
    }
    let notional = Decimal::try_from_i128_with_scale(notional, 0).ok()?;
    let volume = Decimal::try_from_i128_with_scale(volume, 0).ok()?;
    notional.checked_div(volume)
}

/// Midpoint of best bid and best ask.
pub fn mid_price(depth: &OrderDepth) -> Option<Decimal> {
    let (bid, _) = depth.best_bid()?;
    let (ask, _) = depth.best_ask()?;
    bid.to_decimal()
        .checked_add(ask.to_decimal())?
        .checked_div(dec!(2))
}

/// Top-of-book micro-price: each side's price weighted by the opposite
/// side's volume, so the estimate leans toward the thinner side.
pub fn weighted_mid(depth: &OrderDepth) -> Option<Decimal> {
    let (bid, bid_vol) = depth.best_bid()?;
    let (ask, ask_vol) = depth.best_ask()?;
    let total = bid_vol.to_decimal().checked_add(ask_vol.to_decimal())?;
    if total.is_zero() {
        return None;
    }
    let lean_ask = bid_vol.to_decimal().checked_mul(ask.to_decimal())?;
    let lean_bid = ask_vol.to_decimal().checked_mul(bid.to_decimal())?;
    lean_ask.checked_add(lean_bid)?.checked_div(total)
}
