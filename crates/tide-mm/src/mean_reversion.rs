//! Mean reversion: buy below the expected price, sell lots above cost.

use rust_decimal::Decimal;
use tide_core::{Order, OrderDepth, Symbol};
use tide_position::{InventoryLedger, PositionBudget, PositionResult};
use tide_telemetry::DiagnosticsLogger;
use tracing::{debug, warn};

use crate::estimator::expected_price;
use crate::matcher::match_lots;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeanReversionOutcome {
    /// Buys first, then the matcher's sells.
    pub orders: Vec<Order>,
    /// `None` when the book's notional overflowed; the buy phase was skipped.
    pub expected_price: Option<Decimal>,
    pub realized_pnl: i64,
    /// Sell phase stopped on the position limit.
    pub halted: bool,
}

/// Run both phases for one instrument.
///
/// Buy phase: every ask strictly below the expected price, cheapest first,
/// whole level, if the budget allows. Each buy becomes a ledger lot. An
/// unrepresentable expected price skips the buy phase only.
/// Sell phase: [`match_lots`] against the bids as they rest in the book.
pub fn run_mean_reversion(
    symbol: &Symbol,
    depth: &OrderDepth,
    ledger: &mut InventoryLedger,
    budget: &mut PositionBudget,
    diagnostics: &mut DiagnosticsLogger,
) -> PositionResult<MeanReversionOutcome> {
    let expected = expected_price(depth);
    let mut orders = Vec::new();

    match expected {
        Some(expected) => {
            for (price, size) in depth.asks_ascending() {
                if price.to_decimal() >= expected {
                    break;
                }
                if !budget.can_buy(size) {
                    continue;
                }
                ledger.add(symbol, price, size)?;
                budget.record_buy(size);
                diagnostics.print(format!("BUY {size}x {price}"));
                debug!(%symbol, %price, %size, %expected, "mean reversion buy");
                orders.push(Order::buy(symbol.clone(), price, size));
            }
        }
        None => warn!(%symbol, "expected price overflowed, buy phase skipped"),
    }

    let bids: Vec<_> = depth.bids_ascending().collect();
    let matched = match_lots(symbol, ledger, &bids, budget, diagnostics)?;
    orders.extend(matched.orders);

    Ok(MeanReversionOutcome {
        orders,
        expected_price: expected,
        realized_pnl: matched.realized_pnl,
        halted: matched.halted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tide_core::{Price, Quantity};

    fn kelp() -> Symbol {
        Symbol::from("KELP")
    }

    #[test]
    fn test_buys_below_expected_and_records_lots() {
        // expected = (2*10 + 2*11 + 4*12 + 4*14) / 12 = 146/12 ≈ 12.17
        let depth = OrderDepth::from_pairs(&[(10, 2), (11, 2)], &[(12, -4), (14, -4)]);
        let mut ledger = InventoryLedger::new();
        let mut budget = PositionBudget::new(Quantity(0), Quantity(50));
        let mut diagnostics = DiagnosticsLogger::default();

        let outcome =
            run_mean_reversion(&kelp(), &depth, &mut ledger, &mut budget, &mut diagnostics)
                .unwrap();

        assert_eq!(
            outcome.orders,
            vec![Order::buy(kelp(), Price(12), Quantity(4))]
        );
        assert_eq!(ledger.quantity_at(&kelp(), Price(12)), Quantity(4));
        assert_eq!(outcome.realized_pnl, 0);
        assert_eq!(diagnostics.trace(), "BUY 4x 12\n");
    }

    #[test]
    fn test_liquidates_existing_lots() {
        let depth = OrderDepth::from_pairs(&[(20, 3)], &[(25, -3)]);
        let mut ledger = InventoryLedger::new();
        ledger.add(&kelp(), Price(18), Quantity(2)).unwrap();
        let mut budget = PositionBudget::new(Quantity(2), Quantity(50));

        let outcome = run_mean_reversion(
            &kelp(),
            &depth,
            &mut ledger,
            &mut budget,
            &mut DiagnosticsLogger::default(),
        )
        .unwrap();

        assert_eq!(
            outcome.orders,
            vec![Order::sell(kelp(), Price(20), Quantity(2))]
        );
        assert_eq!(outcome.realized_pnl, 4);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_zero_limit_trades_nothing_from_flat() {
        let depth = OrderDepth::from_pairs(&[(10, 2)], &[(5, -4), (14, -4)]);
        let mut ledger = InventoryLedger::new();
        let mut budget = PositionBudget::new(Quantity(0), Quantity(0));

        let outcome = run_mean_reversion(
            &kelp(),
            &depth,
            &mut ledger,
            &mut budget,
            &mut DiagnosticsLogger::default(),
        )
        .unwrap();

        assert!(outcome.orders.is_empty());
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_buy_limit_skips_oversized_level() {
        // expected = (1*100 + 10*50 + 2*51) / 13 = 54
        let depth = OrderDepth::from_pairs(&[(100, 1)], &[(50, -10), (51, -2)]);
        let mut ledger = InventoryLedger::new();
        let mut budget = PositionBudget::new(Quantity(0), Quantity(5));

        let outcome = run_mean_reversion(
            &kelp(),
            &depth,
            &mut ledger,
            &mut budget,
            &mut DiagnosticsLogger::default(),
        )
        .unwrap();

        // 51 bought, then sold straight into the 100 bid
        assert_eq!(
            outcome.orders,
            vec![
                Order::buy(kelp(), Price(51), Quantity(2)),
                Order::sell(kelp(), Price(100), Quantity(1)),
            ]
        );
        assert_eq!(ledger.quantity_at(&kelp(), Price(51)), Quantity(1));
        assert_eq!(outcome.realized_pnl, 49);
    }

    #[test]
    fn test_overflowing_book_still_liquidates() {
        let depth = OrderDepth::from_pairs(
            &[(1_000_000_000_000_000, 100_000_000_000_000)],
            &[(1_000_000_000_000_001, -1)],
        );
        let mut ledger = InventoryLedger::new();
        ledger.add(&kelp(), Price(10), Quantity(2)).unwrap();
        let mut budget = PositionBudget::new(Quantity(2), Quantity(50));

        let outcome = run_mean_reversion(
            &kelp(),
            &depth,
            &mut ledger,
            &mut budget,
            &mut DiagnosticsLogger::default(),
        )
        .unwrap();

        assert_eq!(outcome.expected_price, None);
        assert_eq!(
            outcome.orders,
            vec![Order::sell(
                kelp(),
                Price(1_000_000_000_000_000),
                Quantity(2)
            )]
        );
        assert!(ledger.is_empty());
    }
}
