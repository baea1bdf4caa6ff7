//! FIFO trade matcher: converts an execution stream into closed trades.

use crate::domain::{sort_executions_chronological, ClosedTrade, Execution, Side, Symbol};
use std::collections::{BTreeMap, VecDeque};

use super::{MatchReport, OpenLot, UnmatchedSell};

/// Matches buy/sell executions into closed round-trip trades using strict
/// FIFO lot accounting.
///
/// State is scoped to a single run: construct a fresh matcher per input (or
/// use [`TradeMatcher::match_executions`], which does so internally), so
/// unrelated inputs can never leak positions into each other.
pub struct TradeMatcher {
    open_lots: BTreeMap<Symbol, VecDeque<OpenLot>>,
    closed_trades: Vec<ClosedTrade>,
    unmatched_sells: Vec<UnmatchedSell>,
}

impl TradeMatcher {
    pub fn new() -> Self {
        Self {
            open_lots: BTreeMap::new(),
            closed_trades: Vec::new(),
            unmatched_sells: Vec::new(),
        }
    }

    /// Match a batch of executions with fresh state.
    ///
    /// Input need not be pre-sorted: executions are re-sorted by timestamp
    /// ascending with a stable sort, so same-timestamp events keep their
    /// original relative order and the run is deterministic for identical
    /// input.
    pub fn match_executions(executions: &[Execution]) -> MatchReport {
        let mut ordered = executions.to_vec();
        sort_executions_chronological(&mut ordered);

        let mut matcher = Self::new();
        for execution in &ordered {
            matcher.process_execution(execution);
        }
        matcher.into_report()
    }

    /// Process a single execution, updating per-symbol lot queues and
    /// emitting closed trades for every FIFO match event.
    ///
    /// Executions must arrive in chronological order; callers other than
    /// [`TradeMatcher::match_executions`] are responsible for sorting.
    pub fn process_execution(&mut self, execution: &Execution) {
        match execution.side {
            Side::Buy => self.process_buy(execution),
            Side::Sell => self.process_sell(execution),
        }
    }

    /// A buy opens a new lot at the back of its symbol's queue. No matching
    /// occurs on buys.
    fn process_buy(&mut self, execution: &Execution) {
        self.open_lots
            .entry(execution.symbol.clone())
            .or_default()
            .push_back(OpenLot {
                remaining_quantity: execution.quantity,
                entry_price: execution.price,
                entry_timestamp: execution.timestamp,
                entry_order_id: execution.order_id.clone(),
            });
    }

    /// A sell consumes the symbol's oldest lots first. Each lot touched
    /// emits one closed trade with the matched quantity; any remainder once
    /// the queue empties is recorded as unmatched.
    fn process_sell(&mut self, execution: &Execution) {
        let mut remaining_sell_qty = execution.quantity;

        if let Some(queue) = self.open_lots.get_mut(&execution.symbol) {
            while let Some(lot) = queue.front_mut() {
                let match_qty = remaining_sell_qty.min(lot.remaining_quantity);

                self.closed_trades.push(ClosedTrade::from_match(
                    execution.symbol.clone(),
                    lot.entry_timestamp,
                    execution.timestamp,
                    lot.entry_price,
                    execution.price,
                    match_qty,
                    lot.entry_order_id.clone(),
                    execution.order_id.clone(),
                ));

                lot.remaining_quantity -= match_qty;
                remaining_sell_qty -= match_qty;

                if lot.remaining_quantity.is_zero() {
                    queue.pop_front();
                }
                if remaining_sell_qty.is_zero() {
                    break;
                }
            }
        }

        if !remaining_sell_qty.is_zero() {
            tracing::warn!(
                symbol = %execution.symbol,
                order_id = %execution.order_id,
                unmatched_quantity = %remaining_sell_qty,
                "sell exceeds open position; dropping unmatched remainder"
            );
            self.unmatched_sells.push(UnmatchedSell {
                symbol: execution.symbol.clone(),
                timestamp: execution.timestamp,
                order_id: execution.order_id.clone(),
                price: execution.price,
                unmatched_quantity: remaining_sell_qty,
            });
        }
    }

    /// Consume the matcher and return the run's outputs.
    pub fn into_report(self) -> MatchReport {
        let open_lots = self
            .open_lots
            .into_iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(symbol, queue)| (symbol, queue.into_iter().collect()))
            .collect();

        MatchReport {
            closed_trades: self.closed_trades,
            open_lots,
            unmatched_sells: self.unmatched_sells,
        }
    }
}

impl Default for TradeMatcher {
    fn default() -> Self {
        Self::new()
    }
}
