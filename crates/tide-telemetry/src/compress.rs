//! Compact positional projections for the diagnostics frame.
//!
//! Field names are dropped in favour of fixed positions so a frame carries
//! as much of the tick as possible within its byte budget. Visualizers read
//! these arrays by index; the layouts below are the contract.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};
use tide_core::{
    Listing, Observation, OrderDepth, OrderMap, Price, Quantity, Symbol, Trade, TradingState,
};

/// `[timestamp, trader_data, listings, order_depths, own_trades,
/// market_trades, position, observations]`
///
/// `trader_data` is passed separately so the caller can substitute a
/// truncated copy.
pub fn compress_state(state: &TradingState, trader_data: &str) -> Value {
    json!([
        state.timestamp,
        trader_data,
        compress_listings(&state.listings),
        compress_order_depths(&state.order_depths),
        compress_trades(&state.own_trades),
        compress_trades(&state.market_trades),
        compress_position(&state.position),
        compress_observations(&state.observations),
    ])
}

/// `[[symbol, product, denomination], ...]`
pub fn compress_listings(listings: &BTreeMap<Symbol, Listing>) -> Value {
    Value::Array(
        listings
            .values()
            .map(|l| json!([l.symbol.as_str(), l.product, l.denomination]))
            .collect(),
    )
}

/// `{symbol: [buy_orders, sell_orders]}` with price keys as strings.
pub fn compress_order_depths(depths: &BTreeMap<Symbol, OrderDepth>) -> Value {
    let mut out = Map::new();
    for (symbol, depth) in depths {
        out.insert(
            symbol.to_string(),
            json!([levels(&depth.buy_orders), levels(&depth.sell_orders)]),
        );
    }
    Value::Object(out)
}

fn levels(side: &BTreeMap<Price, Quantity>) -> Value {
    let mut out = Map::new();
    for (price, qty) in side {
        out.insert(price.to_string(), json!(qty.inner()));
    }
    Value::Object(out)
}

/// `[[symbol, price, quantity, buyer, seller, timestamp], ...]`
pub fn compress_trades(trades: &BTreeMap<Symbol, Vec<Trade>>) -> Value {
    Value::Array(
        trades
            .values()
            .flatten()
            .map(|t| {
                json!([
                    t.symbol.as_str(),
                    t.price.inner(),
                    t.quantity.inner(),
                    t.buyer,
                    t.seller,
                    t.timestamp,
                ])
            })
            .collect(),
    )
}

fn compress_position(position: &BTreeMap<Symbol, Quantity>) -> Value {
    let mut out = Map::new();
    for (symbol, qty) in position {
        out.insert(symbol.to_string(), json!(qty.inner()));
    }
    Value::Object(out)
}

/// `[plain_values, {product: [bid, ask, transport, export, import, sugar, sunlight]}]`
pub fn compress_observations(observations: &Observation) -> Value {
    let mut conversions = Map::new();
    for (product, o) in &observations.conversion_observations {
        conversions.insert(
            product.clone(),
            json!([
                o.bid_price,
                o.ask_price,
                o.transport_fees,
                o.export_tariff,
                o.import_tariff,
                o.sugar_price,
                o.sunlight_index,
            ]),
        );
    }
    json!([observations.plain_value_observations, conversions])
}

/// `[[symbol, price, quantity], ...]` in instrument order.
pub fn compress_orders(orders: &OrderMap) -> Value {
    Value::Array(
        orders
            .values()
            .flatten()
            .map(|o| json!([o.symbol.as_str(), o.price.inner(), o.quantity.inner()]))
            .collect(),
    )
}
