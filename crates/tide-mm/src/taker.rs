//! Fair-value taker.

use tide_core::{Order, OrderDepth, Symbol};
use tide_position::PositionBudget;
use tide_telemetry::DiagnosticsLogger;
use tracing::{debug, warn};

use crate::estimator::Estimator;

/// Take every ask strictly below the fair value (cheapest first) and hit
/// every bid strictly above it (highest first). Whole levels, within the
/// budget, no ledger.
pub fn take_fair_value(
    symbol: &Symbol,
    depth: &OrderDepth,
    budget: &mut PositionBudget,
    estimator: Estimator,
    diagnostics: &mut DiagnosticsLogger,
) -> Vec<Order> {
    let Some(expected) = estimator.estimate(depth) else {
        warn!(%symbol, estimator = estimator.as_str(), "no fair value, not taking");
        return Vec::new();
    };
    let mut orders = Vec::new();

    for (price, size) in depth.asks_ascending() {
        if price.to_decimal() >= expected {
            break;
        }
        if budget.can_buy(size) {
            budget.record_buy(size);
            diagnostics.print(format!("BUY {size}x {price}"));
            debug!(%symbol, %price, %size, %expected, "taker buy");
            orders.push(Order::buy(symbol.clone(), price, size));
        }
    }

    for (price, size) in depth.bids_ascending().rev() {
        if price.to_decimal() <= expected {
            break;
        }
        if budget.can_sell(size) {
            budget.record_sell(size);
            diagnostics.print(format!("SELL {size}x {price}"));
            debug!(%symbol, %price, %size, %expected, "taker sell");
            orders.push(Order::sell(symbol.clone(), price, size));
        }
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use tide_core::{Price, Quantity};

    #[test]
    fn test_takes_both_sides_of_crossed_fair_value() {
        let squid = Symbol::from("SQUID_INK");
        // expected = (5*100 + 1*104 + 1*96 + 5*100) / 12 = 100
        let depth = OrderDepth::from_pairs(&[(100, 5), (104, 1)], &[(96, -1), (100, -5)]);
        let mut budget = PositionBudget::new(Quantity(0), Quantity(50));
        let orders = take_fair_value(
            &squid,
            &depth,
            &mut budget,
            Estimator::Expected,
            &mut DiagnosticsLogger::default(),
        );
        assert_eq!(
            orders,
            vec![
                Order::buy(squid.clone(), Price(96), Quantity(1)),
                Order::sell(squid, Price(104), Quantity(1)),
            ]
        );
    }

    #[test]
    fn test_respects_limit() {
        let squid = Symbol::from("SQUID_INK");
        let depth = OrderDepth::from_pairs(&[(100, 5)], &[(90, -3), (200, -3)]);
        let mut budget = PositionBudget::new(Quantity(49), Quantity(50));
        let orders = take_fair_value(
            &squid,
            &depth,
            &mut budget,
            Estimator::Expected,
            &mut DiagnosticsLogger::default(),
        );
        assert!(orders.is_empty());
    }

    #[test]
    fn test_mid_estimator_and_overflow() {
        let squid = Symbol::from("SQUID_INK");
        // Crossed top of book: mid = (100 + 96) / 2 = 98, while the deep
        // 110 ask drags the full-depth VWAP above the bid
        let depth = OrderDepth::from_pairs(&[(100, 1)], &[(96, -1), (110, -50)]);
        let mut budget = PositionBudget::new(Quantity(0), Quantity(50));
        let orders = take_fair_value(
            &squid,
            &depth,
            &mut budget,
            Estimator::Mid,
            &mut DiagnosticsLogger::default(),
        );
        assert_eq!(
            orders,
            vec![
                Order::buy(squid.clone(), Price(96), Quantity(1)),
                Order::sell(squid.clone(), Price(100), Quantity(1)),
            ]
        );

        let huge = OrderDepth::from_pairs(
            &[(1_000_000_000_000_000, 100_000_000_000_000)],
            &[(1, -1)],
        );
        let orders = take_fair_value(
            &squid,
            &huge,
            &mut budget,
            Estimator::Expected,
            &mut DiagnosticsLogger::default(),
        );
        assert!(orders.is_empty());
    }
}
