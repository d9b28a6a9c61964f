//! Market making for an instrument with a known fair value.

use tide_core::{Order, OrderDepth, Price, Symbol};
use tide_position::PositionBudget;
use tide_telemetry::DiagnosticsLogger;
use tracing::debug;

/// Take every ask at or below `buy_peg` (cheapest first) and every bid at
/// or above `sell_peg` (highest first), whole levels only, as long as the
/// budget allows.
pub fn quote_pegged(
    symbol: &Symbol,
    depth: &OrderDepth,
    budget: &mut PositionBudget,
    buy_peg: Price,
    sell_peg: Price,
    diagnostics: &mut DiagnosticsLogger,
) -> Vec<Order> {
    let mut orders = Vec::new();

    for (price, size) in depth.asks_ascending() {
        if price > buy_peg {
            break;
        }
        if !budget.can_buy(size) {
            continue;
        }
        diagnostics.print(format!("BUY {size}x {price}"));
        debug!(%symbol, %price, %size, "pegged buy");
        budget.record_buy(size);
        orders.push(Order::buy(symbol.clone(), price, size));
    }

    for (price, size) in depth.bids_ascending().rev() {
        if price < sell_peg {
            break;
        }
        if !budget.can_sell(size) {
            continue;
        }
        diagnostics.print(format!("SELL {size}x {price}"));
        debug!(%symbol, %price, %size, "pegged sell");
        budget.record_sell(size);
        orders.push(Order::sell(symbol.clone(), price, size));
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use tide_core::Quantity;

    fn resin() -> Symbol {
        Symbol::from("RAINFOREST_RESIN")
    }

    fn run(depth: &OrderDepth, position: i64, limit: i64) -> (Vec<Order>, DiagnosticsLogger) {
        let mut budget = PositionBudget::new(Quantity(position), Quantity(limit));
        let mut diagnostics = DiagnosticsLogger::default();
        let orders = quote_pegged(
            &resin(),
            depth,
            &mut budget,
            Price(9999),
            Price(10001),
            &mut diagnostics,
        );
        (orders, diagnostics)
    }

    #[test]
    fn test_takes_levels_through_pegs() {
        let depth = OrderDepth::from_pairs(
            &[(9996, 4), (10002, 3), (10001, 2)],
            &[(9998, -5), (9999, -1), (10003, -8)],
        );
        let (orders, diagnostics) = run(&depth, 0, 50);
        assert_eq!(
            orders,
            vec![
                Order::buy(resin(), Price(9998), Quantity(5)),
                Order::buy(resin(), Price(9999), Quantity(1)),
                Order::sell(resin(), Price(10002), Quantity(3)),
                Order::sell(resin(), Price(10001), Quantity(2)),
            ]
        );
        assert_eq!(
            diagnostics.trace(),
            "BUY 5x 9998\nBUY 1x 9999\nSELL 3x 10002\nSELL 2x 10001\n"
        );
    }

    #[test]
    fn test_nothing_inside_pegs() {
        let depth = OrderDepth::from_pairs(&[(10000, 4)], &[(10000, -5)]);
        let (orders, _) = run(&depth, 0, 50);
        assert!(orders.is_empty());
    }

    #[test]
    fn test_never_breaches_limit_in_aggregate() {
        let depth = OrderDepth::from_pairs(
            &[(10001, 6), (10002, 6), (10003, 6)],
            &[(9995, -6), (9996, -6), (9997, -6)],
        );
        let (orders, _) = run(&depth, 3, 10);
        let bought: i64 = orders
            .iter()
            .filter(|o| o.quantity.is_positive())
            .map(|o| o.quantity.inner())
            .sum();
        let sold: i64 = orders
            .iter()
            .filter(|o| o.quantity.is_negative())
            .map(|o| o.size().inner())
            .sum();
        assert!(3 + bought <= 10);
        assert!(3 - sold >= -10);
        // One ask level fits (3 + 6 = 9), two bid levels fit (3 - 12 = -9)
        assert_eq!(bought, 6);
        assert_eq!(sold, 12);
    }

    #[test]
    fn test_smaller_later_level_still_taken() {
        let depth = OrderDepth::from_pairs(&[], &[(9990, -8), (9995, -2)]);
        let (orders, _) = run(&depth, 45, 50);
        assert_eq!(orders, vec![Order::buy(resin(), Price(9995), Quantity(2))]);
    }
}
