//! Versioned state envelope.
//!
//! Wire shape:
//!
//! ```json
//! {"version":1,"ledger":{"KELP":{"2019":5}},"realized_pnl":{"KELP":12}}
//! ```
//!
//! Decoding happens in two passes. The first reads only `version` so an
//! envelope written by a newer build is reported as `UnsupportedVersion`
//! instead of a confusing field error. The second is a strict typed decode
//! that rejects unknown fields, followed by ledger invariant validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tide_core::Symbol;
use tide_position::{InventoryLedger, LotMap};
use tracing::debug;

use crate::error::{PersistenceError, PersistenceResult};

/// Envelope version written by this build.
pub const STATE_VERSION: u64 = 1;

/// Everything that survives from one tick to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub ledger: InventoryLedger,
    /// Cumulative profit of liquidated lots, in ticks.
    pub realized_pnl: BTreeMap<Symbol, i64>,
}

impl PersistedState {
    pub fn new(ledger: InventoryLedger) -> Self {
        Self {
            ledger,
            realized_pnl: BTreeMap::new(),
        }
    }

    pub fn record_realized(&mut self, symbol: &Symbol, pnl: i64) {
        if pnl == 0 {
            return;
        }
        let total = self.realized_pnl.entry(symbol.clone()).or_insert(0);
        *total = total.saturating_add(pnl);
    }

    pub fn realized(&self, symbol: &Symbol) -> i64 {
        self.realized_pnl.get(symbol).copied().unwrap_or(0)
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u64,
    ledger: &'a InventoryLedger,
    realized_pnl: &'a BTreeMap<Symbol, i64>,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: Option<u64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    #[allow(dead_code)]
    version: u64,
    ledger: BTreeMap<Symbol, LotMap>,
    #[serde(default)]
    realized_pnl: BTreeMap<Symbol, i64>,
}

/// Data errors are shape problems; anything else means the text is not JSON.
fn classify(err: serde_json::Error) -> PersistenceError {
    match err.classify() {
        Category::Data => PersistenceError::SchemaMismatch(err.to_string()),
        _ => PersistenceError::Json(err),
    }
}

pub struct StateCodec;

impl StateCodec {
    /// Encode the state into the string handed back to the venue.
    pub fn encode(state: &PersistedState) -> PersistenceResult<String> {
        let envelope = EnvelopeRef {
            version: STATE_VERSION,
            ledger: &state.ledger,
            realized_pnl: &state.realized_pnl,
        };
        Ok(serde_json::to_string(&envelope)?)
    }

    /// Decode the previous tick's string. Empty input is the first tick.
    pub fn decode(data: &str) -> PersistenceResult<PersistedState> {
        if data.trim().is_empty() {
            debug!("no persisted state, starting empty");
            return Ok(PersistedState::default());
        }

        let probe: VersionProbe = serde_json::from_str(data).map_err(classify)?;
        match probe.version {
            None => {
                return Err(PersistenceError::SchemaMismatch(
                    "missing field `version`".to_string(),
                ))
            }
            Some(STATE_VERSION) => {}
            Some(other) => return Err(PersistenceError::UnsupportedVersion(other)),
        }

        let envelope: Envelope = serde_json::from_str(data).map_err(classify)?;
        let ledger = InventoryLedger::from_lots(envelope.ledger)?;
        Ok(PersistedState {
            ledger,
            realized_pnl: envelope.realized_pnl,
        })
    }
}
