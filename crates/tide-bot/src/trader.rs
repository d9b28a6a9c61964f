//! One decision cycle per tick.

use std::collections::BTreeSet;

use tide_core::{Order, OrderDepth, OrderMap, Symbol, TradingState};
use tide_mm::{
    quote_pegged, quote_skewed, run_mean_reversion, take_fair_value, InstrumentPlan, PolicyConfig,
};
use tide_persistence::{PersistedState, StateCodec};
use tide_position::PositionBudget;
use tide_telemetry::{DiagnosticsFrame, DiagnosticsLogger, Metrics};
use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::error::AppResult;

/// Everything handed back to the venue for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutput {
    /// Orders per instrument. Instruments skipped this tick map to an empty list.
    pub orders: OrderMap,
    /// Always 0: conversions are not used.
    pub conversions: i64,
    /// State string to return as the next tick's `trader_data`.
    pub trader_data: String,
    pub diagnostics: DiagnosticsFrame,
}

impl TickOutput {
    pub fn order_count(&self) -> usize {
        self.orders.values().map(Vec::len).sum()
    }
}

/// Stateless decision engine. All cross-tick memory travels in
/// `TradingState::trader_data`.
#[derive(Debug, Clone)]
pub struct Trader {
    config: AppConfig,
}

impl Trader {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run one tick.
    ///
    /// A state string that does not decode is an error: trading on from an
    /// empty ledger would forget lots the venue still holds.
    pub fn run(&self, state: &TradingState) -> AppResult<TickOutput> {
        let mut diagnostics = DiagnosticsLogger::new(&self.config.diagnostics);
        let mut persisted = StateCodec::decode(&state.trader_data).map_err(|e| {
            Metrics::state_decode_failed();
            error!(timestamp = state.timestamp, error = %e, "persisted state rejected");
            e
        })?;

        let mut orders = OrderMap::new();
        for (symbol, depth) in &state.order_depths {
            let book_state = depth.state();
            if !book_state.is_tradeable() {
                debug!(%symbol, %book_state, "instrument skipped");
                Metrics::instrument_skipped(symbol.as_str(), &book_state.to_string());
                orders.insert(symbol.clone(), Vec::new());
                continue;
            }

            let plan = self.config.strategy.lookup(symbol);
            if !plan.configured {
                warn!(%symbol, policy = plan.policy.name(), "unconfigured instrument, limit 0");
            }
            let emitted = self.dispatch(
                symbol,
                depth,
                plan,
                state,
                &mut persisted,
                &mut diagnostics,
            )?;
            for order in &emitted {
                Metrics::order_emitted(symbol.as_str(), order.side().as_str());
            }
            orders.insert(symbol.clone(), emitted);
        }

        record_ledger_metrics(state, &persisted);

        let trader_data = StateCodec::encode(&persisted)?;
        let conversions = 0;
        let frame = diagnostics.flush(state, &orders, conversions, &trader_data)?;

        Metrics::tick_processed();
        let output = TickOutput {
            orders,
            conversions,
            trader_data,
            diagnostics: frame,
        };
        info!(
            timestamp = state.timestamp,
            instruments = output.orders.len(),
            orders = output.order_count(),
            state_bytes = output.trader_data.len(),
            frame_bytes = output.diagnostics.len(),
            "tick processed"
        );
        Ok(output)
    }

    fn dispatch(
        &self,
        symbol: &Symbol,
        depth: &OrderDepth,
        plan: InstrumentPlan<'_>,
        state: &TradingState,
        persisted: &mut PersistedState,
        diagnostics: &mut DiagnosticsLogger,
    ) -> AppResult<Vec<Order>> {
        let mut budget = PositionBudget::new(state.position_of(symbol), plan.limit);

        let orders = match plan.policy {
            PolicyConfig::Pegged { buy_peg, sell_peg } => {
                quote_pegged(symbol, depth, &mut budget, *buy_peg, *sell_peg, diagnostics)
            }
            PolicyConfig::MeanReversion => {
                let outcome = run_mean_reversion(
                    symbol,
                    depth,
                    &mut persisted.ledger,
                    &mut budget,
                    diagnostics,
                )?;
                if outcome.halted {
                    Metrics::matcher_halted(symbol.as_str());
                }
                persisted.record_realized(symbol, outcome.realized_pnl);
                debug!(
                    %symbol,
                    expected = ?outcome.expected_price,
                    realized = outcome.realized_pnl,
                    halted = outcome.halted,
                    "mean reversion done"
                );
                outcome.orders
            }
            PolicyConfig::Skewed {
                spread_bps,
                base_size,
                estimator,
            } => quote_skewed(
                symbol,
                depth,
                &mut budget,
                *estimator,
                *spread_bps,
                *base_size,
                diagnostics,
            ),
            PolicyConfig::FairValueTaker { estimator } => {
                take_fair_value(symbol, depth, &mut budget, *estimator, diagnostics)
            }
            PolicyConfig::Idle => Vec::new(),
        };

        Ok(orders)
    }
}

fn record_ledger_metrics(state: &TradingState, persisted: &PersistedState) {
    let symbols = state
        .order_depths
        .keys()
        .chain(persisted.ledger.symbols())
        .collect::<BTreeSet<_>>();
    for symbol in symbols {
        Metrics::ledger_state(
            symbol.as_str(),
            persisted.ledger.lots(symbol).len(),
            persisted.ledger.open_quantity(symbol).inner(),
        );
        Metrics::realized_pnl(symbol.as_str(), persisted.realized(symbol));
    }
}
