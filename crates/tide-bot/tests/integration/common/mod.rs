//! Shared tick fixtures.

use tide_core::{OrderDepth, Quantity, Symbol, TradingState};

/// Build a tick from `(symbol, buys, sells)` books and `(symbol, position)` pairs.
pub fn tick(
    timestamp: i64,
    trader_data: &str,
    books: &[(&str, &[(i64, i64)], &[(i64, i64)])],
    positions: &[(&str, i64)],
) -> TradingState {
    let mut state = TradingState {
        timestamp,
        trader_data: trader_data.to_string(),
        ..Default::default()
    };
    for (symbol, buys, sells) in books {
        state
            .order_depths
            .insert(Symbol::from(*symbol), OrderDepth::from_pairs(buys, sells));
    }
    for (symbol, qty) in positions {
        state.position.insert(Symbol::from(*symbol), Quantity(*qty));
    }
    state
}
