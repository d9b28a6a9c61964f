//! Per-tick diagnostics collector.
//!
//! Policies append free-text trace lines while a tick runs. At the end of
//! the tick [`DiagnosticsLogger::flush`] packs the tick into one compact
//! JSON array:
//!
//! ```text
//! [state_projection, order_projection, conversions, outgoing_state, trace]
//! ```
//!
//! The incoming state (inside the state projection), the outgoing state and
//! the trace are variable length. Each gets an equal share of whatever the
//! fixed part leaves of the budget. Sizes are measured after JSON escaping,
//! so a trace full of newlines or quotes cannot push the frame over budget.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tide_core::{OrderMap, TradingState};
use tracing::{debug, warn};

use crate::compress::{compress_orders, compress_state};
use crate::error::TelemetryResult;
use crate::metrics::Metrics;

const ELLIPSIS: &str = "...";

/// Diagnostics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Upper bound on a serialized frame, in bytes.
    #[serde(default = "default_max_log_length")]
    pub max_log_length: usize,
}

fn default_max_log_length() -> usize {
    3750
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            max_log_length: default_max_log_length(),
        }
    }
}

/// One serialized frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticsFrame {
    /// Compact JSON array, ready to be written to the trace channel.
    pub line: String,
    /// Number of variable fields that had to be cut.
    pub truncated_fields: usize,
}

impl DiagnosticsFrame {
    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

/// Trace collector with a lifetime of exactly one tick.
#[derive(Debug, Clone)]
pub struct DiagnosticsLogger {
    logs: String,
    max_log_length: usize,
}

impl Default for DiagnosticsLogger {
    fn default() -> Self {
        Self::new(&DiagnosticsConfig::default())
    }
}

impl DiagnosticsLogger {
    pub fn new(config: &DiagnosticsConfig) -> Self {
        Self {
            logs: String::new(),
            max_log_length: config.max_log_length,
        }
    }

    /// Append one trace line.
    pub fn print(&mut self, line: impl AsRef<str>) {
        self.logs.push_str(line.as_ref());
        self.logs.push('\n');
    }

    /// Trace accumulated since the last flush.
    pub fn trace(&self) -> &str {
        &self.logs
    }

    pub fn max_log_length(&self) -> usize {
        self.max_log_length
    }

    /// Build the tick's frame and clear the trace.
    pub fn flush(
        &mut self,
        state: &TradingState,
        orders: &OrderMap,
        conversions: i64,
        trader_data: &str,
    ) -> TelemetryResult<DiagnosticsFrame> {
        let order_projection = compress_orders(orders);
        let base = serde_json::to_string(&Value::Array(vec![
            compress_state(state, ""),
            order_projection.clone(),
            Value::from(conversions),
            Value::from(""),
            Value::from(""),
        ]))?
        .len();

        let share = self.max_log_length.saturating_sub(base) / 3;
        if base > self.max_log_length {
            warn!(
                base,
                budget = self.max_log_length,
                "fixed part of diagnostics frame exceeds budget"
            );
        }

        let mut truncated_fields = 0;
        let mut cap = |field: &str, value: &str| {
            let (out, cut) = truncate_escaped(value, share);
            if cut {
                truncated_fields += 1;
                Metrics::diagnostics_truncated(field);
            }
            out
        };
        let state_in = cap("state_in", &state.trader_data);
        let state_out = cap("state_out", trader_data);
        let trace = cap("trace", &self.logs);

        let line = serde_json::to_string(&Value::Array(vec![
            compress_state(state, &state_in),
            order_projection,
            Value::from(conversions),
            Value::from(state_out),
            Value::from(trace),
        ]))?;

        debug!(
            bytes = line.len(),
            base, share, truncated_fields, "diagnostics frame flushed"
        );
        self.logs.clear();
        Ok(DiagnosticsFrame {
            line,
            truncated_fields,
        })
    }
}

/// Bytes `c` occupies inside a JSON string literal.
fn escaped_len(c: char) -> usize {
    match c {
        '"' | '\\' | '\u{08}' | '\u{0C}' | '\n' | '\r' | '\t' => 2,
        c if (c as u32) < 0x20 => 6,
        c => c.len_utf8(),
    }
}

fn escaped_size(value: &str) -> usize {
    value.chars().map(escaped_len).sum()
}

/// Cut `value` so its escaped size is at most `max_len`, ending in `...`.
///
/// Never splits a character or an escape sequence. Returns whether a cut
/// happened.
fn truncate_escaped(value: &str, max_len: usize) -> (String, bool) {
    if escaped_size(value) <= max_len {
        return (value.to_string(), false);
    }
    if max_len < ELLIPSIS.len() {
        return (ELLIPSIS[..max_len].to_string(), true);
    }

    let room = max_len - ELLIPSIS.len();
    let mut used = 0;
    let mut end = 0;
    for (idx, c) in value.char_indices() {
        let len = escaped_len(c);
        if used + len > room {
            break;
        }
        used += len;
        end = idx + c.len_utf8();
    }
    let mut out = String::with_capacity(end + ELLIPSIS.len());
    out.push_str(&value[..end]);
    out.push_str(ELLIPSIS);
    (out, true)
}
