//! Pure computation engines for deterministic tradebook analysis.

use crate::domain::{ClosedTrade, OrderId, Symbol};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub mod matcher;
pub mod summary;

pub use matcher::TradeMatcher;
pub use summary::{summarize, SummaryStats};

/// An open long lot awaiting offsetting sells.
///
/// Invariant: `remaining_quantity > 0` for every lot present in a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenLot {
    pub remaining_quantity: Decimal,
    pub entry_price: Decimal,
    pub entry_timestamp: NaiveDateTime,
    pub entry_order_id: OrderId,
}

/// A sell (or sell remainder) with no open lot to consume.
///
/// A data-quality signal: the position was likely opened before the start of
/// the uploaded log. Never treated as a short sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedSell {
    pub symbol: Symbol,
    pub timestamp: NaiveDateTime,
    pub order_id: OrderId,
    pub price: Decimal,
    /// The sell quantity that found no lot to offset.
    pub unmatched_quantity: Decimal,
}

/// Read-only snapshot of one matching run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchReport {
    /// Closed trades in emission order (sell-processing order, oldest lot
    /// first within a multi-lot sell).
    pub closed_trades: Vec<ClosedTrade>,
    /// Lots still open at the end of the run, per symbol, FIFO order.
    pub open_lots: BTreeMap<Symbol, Vec<OpenLot>>,
    /// Sells (or remainders) that exceeded the available open quantity.
    pub unmatched_sells: Vec<UnmatchedSell>,
}
