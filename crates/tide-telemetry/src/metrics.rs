//! Prometheus metrics for tide.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A failure means a
//! duplicate metric name, which is a programming error that should crash at
//! first use rather than silently drop samples.

use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge_vec, Encoder, IntCounter,
    IntCounterVec, IntGaugeVec, TextEncoder,
};

use crate::error::TelemetryResult;

/// Ticks processed.
pub static TICKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("tide_ticks_total", "Total ticks processed").unwrap()
});

/// Orders emitted.
/// Labels: symbol, side (buy/sell)
pub static ORDERS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tide_orders_total",
        "Total orders emitted",
        &["symbol", "side"]
    )
    .unwrap()
});

/// Instruments skipped for a tick.
/// Labels: symbol, reason (book state)
pub static INSTRUMENT_SKIPPED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tide_instrument_skipped_total",
        "Instruments skipped because the book was not tradeable",
        &["symbol", "reason"]
    )
    .unwrap()
});

/// Open lots per instrument after the tick.
pub static OPEN_LOTS: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!("tide_open_lots", "Open ledger lots", &["symbol"]).unwrap()
});

/// Open lot quantity per instrument after the tick.
pub static OPEN_QUANTITY: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "tide_open_quantity",
        "Total quantity held in open ledger lots",
        &["symbol"]
    )
    .unwrap()
});

/// Lot matcher sweeps stopped by the position limit.
pub static MATCHER_HALTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tide_matcher_halts_total",
        "Lot matcher sweeps halted by the position limit",
        &["symbol"]
    )
    .unwrap()
});

/// Cumulative realized profit per instrument, in ticks.
pub static REALIZED_PNL: Lazy<IntGaugeVec> = Lazy::new(|| {
    register_int_gauge_vec!(
        "tide_realized_pnl",
        "Cumulative realized profit of liquidated lots",
        &["symbol"]
    )
    .unwrap()
});

/// Diagnostics fields cut to fit the frame budget.
/// Labels: field (state_in/state_out/trace)
pub static DIAGNOSTICS_TRUNCATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tide_diagnostics_truncated_total",
        "Diagnostics fields truncated to fit the frame budget",
        &["field"]
    )
    .unwrap()
});

/// Persisted state strings that failed to decode.
pub static STATE_DECODE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "tide_state_decode_failures_total",
        "Persisted state strings rejected by the decoder"
    )
    .unwrap()
});

/// Metrics helper for recording values.
pub struct Metrics;

impl Metrics {
    pub fn tick_processed() {
        TICKS_TOTAL.inc();
    }

    pub fn order_emitted(symbol: &str, side: &str) {
        ORDERS_TOTAL.with_label_values(&[symbol, side]).inc();
    }

    pub fn instrument_skipped(symbol: &str, reason: &str) {
        INSTRUMENT_SKIPPED_TOTAL
            .with_label_values(&[symbol, reason])
            .inc();
    }

    /// Set ledger gauges for an instrument.
    pub fn ledger_state(symbol: &str, lots: usize, quantity: i64) {
        OPEN_LOTS
            .with_label_values(&[symbol])
            .set(i64::try_from(lots).unwrap_or(i64::MAX));
        OPEN_QUANTITY.with_label_values(&[symbol]).set(quantity);
    }

    pub fn matcher_halted(symbol: &str) {
        MATCHER_HALTS_TOTAL.with_label_values(&[symbol]).inc();
    }

    pub fn realized_pnl(symbol: &str, pnl: i64) {
        REALIZED_PNL.with_label_values(&[symbol]).set(pnl);
    }

    pub fn diagnostics_truncated(field: &str) {
        DIAGNOSTICS_TRUNCATED_TOTAL
            .with_label_values(&[field])
            .inc();
    }

    pub fn state_decode_failed() {
        STATE_DECODE_FAILURES_TOTAL.inc();
    }

    /// Render every registered metric in the prometheus text format.
    pub fn render() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
