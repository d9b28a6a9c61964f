//! Pricing and order policies for tide.
//!
//! Every policy works on one instrument's book for one tick and checks each
//! order against a [`PositionBudget`](tide_position::PositionBudget) before
//! emitting it.
//!
//! # Architecture
//!
//! ```text
//! StrategyTable.lookup(symbol) → PolicyConfig
//!   ├─ Pegged:          quote_pegged()      fixed buy/sell pegs
//!   ├─ MeanReversion:   run_mean_reversion()
//!   │                     ├─ expected_price(): full-depth VWAP
//!   │                     ├─ buy phase: asks below expected → ledger lots
//!   │                     └─ match_lots(): lots vs bids, two-pointer sweep
//!   ├─ Skewed:          quote_skewed()      passive two-sided quotes
//!   ├─ FairValueTaker:  take_fair_value()
//!   │   (both around an Estimator: expected | mid | weighted_mid)
//!   └─ Idle
//! ```

pub mod config;
pub mod estimator;
pub mod matcher;
pub mod mean_reversion;
pub mod pegged;
pub mod skewed;
pub mod taker;

pub use config::{InstrumentConfig, InstrumentPlan, PolicyConfig, StrategyTable};
pub use estimator::{expected_price, mid_price, weighted_mid, Estimator};
pub use matcher::{match_lots, MatchOutcome};
pub use mean_reversion::{run_mean_reversion, MeanReversionOutcome};
pub use pegged::quote_pegged;
pub use skewed::{quote_skewed, skewed_prices, SkewedQuote};
pub use taker::take_fair_value;
