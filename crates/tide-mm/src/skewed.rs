//! Passive two-sided quoting around a fair-value estimate.
//!
//! The spread is a fixed fraction of the estimate. Both quotes shift
//! against the current inventory: long positions move the pair down (less
//! eager to buy, more eager to sell), short positions move it up.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tide_core::{Order, OrderDepth, Price, Quantity, Symbol};
use tide_position::PositionBudget;
use tide_telemetry::DiagnosticsLogger;
use tracing::{debug, warn};

use crate::estimator::Estimator;

/// Bid/ask pair before sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkewedQuote {
    pub bid: Price,
    pub ask: Price,
}

/// Quote prices for `fair` at the given inventory.
///
/// `half = fair * spread_bps / 10000 / 2`, `skew = position / limit * half`.
/// Prices are floored to whole ticks. `None` when a step overflows or a
/// price leaves the `i64` range.
pub fn skewed_prices(
    fair: Decimal,
    spread_bps: Decimal,
    position: Quantity,
    limit: Quantity,
) -> Option<SkewedQuote> {
    let half = fair
        .checked_mul(spread_bps)?
        .checked_div(dec!(10000))?
        .checked_div(dec!(2))?;
    let skew = if limit.is_positive() {
        position
            .to_decimal()
            .checked_div(limit.to_decimal())?
            .checked_mul(half)?
    } else {
        Decimal::ZERO
    };
    let bid = fair.checked_sub(half)?.checked_sub(skew)?;
    let ask = fair.checked_add(half)?.checked_sub(skew)?;
    Some(SkewedQuote {
        bid: Price::floor_from(bid)?,
        ask: Price::floor_from(ask)?,
    })
}

/// Emit one bid and one ask of at most `base_size` each, sized so a full
/// fill stays within the limit.
pub fn quote_skewed(
    symbol: &Symbol,
    depth: &OrderDepth,
    budget: &mut PositionBudget,
    estimator: Estimator,
    spread_bps: Decimal,
    base_size: Quantity,
    diagnostics: &mut DiagnosticsLogger,
) -> Vec<Order> {
    let Some(fair) = estimator.estimate(depth) else {
        warn!(%symbol, estimator = estimator.as_str(), "no fair value, not quoting");
        return Vec::new();
    };
    let position = budget.position();
    let limit = budget.limit();

    if let (Some((best_bid, _)), Some((best_ask, _))) = (depth.best_bid(), depth.best_ask()) {
        diagnostics.print(format!(
            "PRODUCT={symbol} | BEST_BID={best_bid} | BEST_ASK={best_ask} | MID={fair} | POS={position}"
        ));
    }

    let Some(quote) = skewed_prices(fair, spread_bps, position, limit) else {
        warn!(%symbol, %fair, %spread_bps, "quote prices out of range, not quoting");
        return Vec::new();
    };

    let mut orders = Vec::with_capacity(2);

    let bid_size = base_size.abs().min(budget.buy_capacity());
    if bid_size.is_positive() {
        budget.record_buy(bid_size);
        diagnostics.print(format!("BUY {bid_size}x {}", quote.bid));
        debug!(%symbol, price = %quote.bid, size = %bid_size, %fair, "skewed bid");
        orders.push(Order::buy(symbol.clone(), quote.bid, bid_size));
    }

    let ask_size = base_size.abs().min(budget.sell_capacity());
    if ask_size.is_positive() {
        budget.record_sell(ask_size);
        diagnostics.print(format!("SELL {ask_size}x {}", quote.ask));
        debug!(%symbol, price = %quote.ask, size = %ask_size, %fair, "skewed ask");
        orders.push(Order::sell(symbol.clone(), quote.ask, ask_size));
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kelp() -> Symbol {
        Symbol::from("KELP")
    }

    #[test]
    fn test_flat_quotes_symmetric() {
        let quote = skewed_prices(dec!(2000), dec!(50), Quantity(0), Quantity(50)).unwrap();
        // half = 2000 * 0.005 / 2 = 5
        assert_eq!(quote.bid, Price(1995));
        assert_eq!(quote.ask, Price(2005));
    }

    #[test]
    fn test_long_inventory_shifts_down() {
        let quote = skewed_prices(dec!(2000), dec!(50), Quantity(25), Quantity(50)).unwrap();
        // skew = 0.5 * 5 = 2.5
        assert_eq!(quote.bid, Price(1992));
        assert_eq!(quote.ask, Price(2002));
    }

    #[test]
    fn test_zero_limit_no_skew() {
        let quote = skewed_prices(dec!(2000), dec!(50), Quantity(7), Quantity(0)).unwrap();
        assert_eq!(quote.bid, Price(1995));
    }

    #[test]
    fn test_sizes_respect_limit() {
        let depth = OrderDepth::from_pairs(&[(1999, 10)], &[(2001, -10)]);
        let mut budget = PositionBudget::new(Quantity(45), Quantity(50));
        let orders = quote_skewed(
            &kelp(),
            &depth,
            &mut budget,
            Estimator::Expected,
            dec!(50),
            Quantity(10),
            &mut DiagnosticsLogger::default(),
        );
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].quantity, Quantity(5));
        assert_eq!(orders[1].quantity, Quantity(-10));
    }

    #[test]
    fn test_at_long_limit_only_asks() {
        let depth = OrderDepth::from_pairs(&[(1999, 10)], &[(2001, -10)]);
        let mut budget = PositionBudget::new(Quantity(50), Quantity(50));
        let mut diagnostics = DiagnosticsLogger::default();
        let orders = quote_skewed(
            &kelp(),
            &depth,
            &mut budget,
            Estimator::Expected,
            dec!(50),
            Quantity(10),
            &mut diagnostics,
        );
        assert_eq!(orders.len(), 1);
        assert!(orders[0].quantity.is_negative());
        assert!(diagnostics.trace().starts_with("PRODUCT=KELP | BEST_BID=1999"));
    }

    #[test]
    fn test_price_overflow_is_none() {
        // Ask lands above i64::MAX
        let fair = Decimal::from(i64::MAX);
        assert_eq!(skewed_prices(fair, dec!(50), Quantity(0), Quantity(50)), None);
        assert_eq!(skewed_prices(Decimal::MAX, dec!(50), Quantity(0), Quantity(50)), None);
    }

    #[test]
    fn test_quotes_around_weighted_mid() {
        // weighted mid = (30*1200 + 10*1000) / 40 = 1150, half = 1150 * 0.02 / 2 = 11.5
        let depth = OrderDepth::from_pairs(&[(1000, 30)], &[(1200, -10)]);
        let mut budget = PositionBudget::new(Quantity(0), Quantity(50));
        let orders = quote_skewed(
            &kelp(),
            &depth,
            &mut budget,
            Estimator::WeightedMid,
            dec!(200),
            Quantity(3),
            &mut DiagnosticsLogger::default(),
        );
        assert_eq!(
            orders,
            vec![
                Order::buy(kelp(), Price(1138), Quantity(3)),
                Order::sell(kelp(), Price(1161), Quantity(3)),
            ]
        );
    }
}
