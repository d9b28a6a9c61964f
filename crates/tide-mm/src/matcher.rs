//! Lot-to-bid matching.
//!
//! Two-pointer sweep over the instrument's lots (cheapest first, `i`) and
//! the resting bids (cheapest first, `j`):
//!
//! - bid above lot: sell `min(lot, level)` at the bid, drain both, advance
//!   whichever reached zero (possibly both)
//! - bid at or below lot: advance `j` only, `i` never moves back
//! - the position limit gates each trade. A trade that would breach `-L`
//!   halts the whole sweep; it is never resized.
//!
//! This is a greedy O(n + m) approximation of the best lot/bid assignment.
//! An exact profit-maximizing assignment would replace this function with a
//! weighted matching solver.

use tide_core::{Order, Price, Quantity, Symbol};
use tide_position::{InventoryLedger, PositionBudget, PositionResult};
use tide_telemetry::DiagnosticsLogger;
use tracing::{debug, warn};

/// Result of one sweep.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    /// Sell orders, in execution order.
    pub orders: Vec<Order>,
    /// Σ (bid − lot price) · quantity over the emitted sells.
    pub realized_pnl: i64,
    /// Bid levels left after the sweep, ascending, drained levels removed.
    pub remaining_bids: Vec<(Price, Quantity)>,
    /// True when the sweep stopped on the position limit.
    pub halted: bool,
}

/// Liquidate `symbol`'s lots against `bids` (ascending, positive sizes).
///
/// Every sale is removed from `ledger` and recorded on `budget`.
pub fn match_lots(
    symbol: &Symbol,
    ledger: &mut InventoryLedger,
    bids: &[(Price, Quantity)],
    budget: &mut PositionBudget,
    diagnostics: &mut DiagnosticsLogger,
) -> PositionResult<MatchOutcome> {
    let mut lots = ledger.lots(symbol);
    let mut levels = bids.to_vec();
    let mut outcome = MatchOutcome::default();

    let (mut i, mut j) = (0, 0);
    while i < lots.len() && j < levels.len() {
        let lot = &mut lots[i];
        let (bid, level) = &mut levels[j];

        if *bid <= lot.price {
            j += 1;
            continue;
        }

        let size = lot.quantity.min(*level);
        if !budget.can_sell(size) {
            warn!(
                %symbol,
                lot_price = %lot.price,
                bid = %bid,
                %size,
                projected = %budget.projected_short(),
                limit = %budget.limit(),
                "lot matching halted at position limit"
            );
            outcome.halted = true;
            break;
        }

        ledger.remove(symbol, lot.price, size)?;
        budget.record_sell(size);
        diagnostics.print(format!("SELL {size}x {bid}"));
        debug!(%symbol, lot_price = %lot.price, bid = %bid, %size, "lot sold");

        let gain = bid
            .inner()
            .saturating_sub(lot.price.inner())
            .saturating_mul(size.inner());
        outcome.realized_pnl = outcome.realized_pnl.saturating_add(gain);
        outcome.orders.push(Order::sell(symbol.clone(), *bid, size));

        lot.quantity -= size;
        *level -= size;
        if lot.quantity.is_zero() {
            i += 1;
        }
        if level.is_zero() {
            j += 1;
        }
    }

    outcome.remaining_bids = levels.into_iter().filter(|(_, q)| !q.is_zero()).collect();
    Ok(outcome)
}
