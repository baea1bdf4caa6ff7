//! Core domain types for tradebook analysis.

pub mod execution;
pub mod ordering;
pub mod primitives;
pub mod trade;

pub use execution::Execution;
pub use ordering::sort_executions_chronological;
pub use primitives::{OrderId, Side, Symbol};
pub use trade::{ClosedTrade, TradeResult};
