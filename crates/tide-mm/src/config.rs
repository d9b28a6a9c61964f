//! Strategy table: which policy trades which instrument, under what limit.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tide_core::{Price, Quantity, Symbol};

use crate::estimator::Estimator;

/// Policy selected for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PolicyConfig {
    /// Take asks at or below `buy_peg` and bids at or above `sell_peg`.
    Pegged { buy_peg: Price, sell_peg: Price },
    /// Buy below the expected price, liquidate lots at a profit.
    MeanReversion,
    /// Passive two-sided quotes around a fair value, skewed by inventory.
    Skewed {
        #[serde(default = "default_spread_bps")]
        spread_bps: Decimal,
        #[serde(default = "default_base_size")]
        base_size: Quantity,
        #[serde(default)]
        estimator: Estimator,
    },
    /// Take any level mispriced against a fair value.
    FairValueTaker {
        #[serde(default)]
        estimator: Estimator,
    },
    /// Emit nothing.
    Idle,
}

fn default_spread_bps() -> Decimal {
    dec!(50)
}

fn default_base_size() -> Quantity {
    Quantity(10)
}

impl PolicyConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pegged { .. } => "pegged",
            Self::MeanReversion => "mean_reversion",
            Self::Skewed { .. } => "skewed",
            Self::FairValueTaker { .. } => "fair_value_taker",
            Self::Idle => "idle",
        }
    }
}

/// Per-instrument entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// Absolute inventory limit.
    pub limit: Quantity,
    pub policy: PolicyConfig,
}

/// Resolved entry for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentPlan<'a> {
    pub limit: Quantity,
    pub policy: &'a PolicyConfig,
    /// False when the instrument fell back to the default policy.
    pub configured: bool,
}

/// Instrument → {policy, limit} table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyTable {
    /// Policy for instruments missing from `instruments`. Their limit is 0.
    #[serde(default = "default_policy")]
    pub default_policy: PolicyConfig,

    #[serde(default = "default_instruments")]
    pub instruments: BTreeMap<Symbol, InstrumentConfig>,
}

fn default_policy() -> PolicyConfig {
    PolicyConfig::MeanReversion
}

fn default_instruments() -> BTreeMap<Symbol, InstrumentConfig> {
    let mut instruments = BTreeMap::new();
    instruments.insert(
        Symbol::from("RAINFOREST_RESIN"),
        InstrumentConfig {
            limit: Quantity(50),
            policy: PolicyConfig::Pegged {
                buy_peg: Price(9999),
                sell_peg: Price(10001),
            },
        },
    );
    for symbol in ["KELP", "SQUID_INK"] {
        instruments.insert(
            Symbol::from(symbol),
            InstrumentConfig {
                limit: Quantity(50),
                policy: PolicyConfig::MeanReversion,
            },
        );
    }
    instruments
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self {
            default_policy: default_policy(),
            instruments: default_instruments(),
        }
    }
}

impl StrategyTable {
    /// Entry for `symbol`; unknown instruments get the default policy with
    /// limit 0, which rejects any order moving the position away from zero.
    pub fn lookup(&self, symbol: &Symbol) -> InstrumentPlan<'_> {
        match self.instruments.get(symbol) {
            Some(entry) => InstrumentPlan {
                limit: entry.limit,
                policy: &entry.policy,
                configured: true,
            },
            None => InstrumentPlan {
                limit: Quantity::ZERO,
                policy: &self.default_policy,
                configured: false,
            },
        }
    }
}
