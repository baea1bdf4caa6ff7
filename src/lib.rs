pub mod api;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod insights;

pub use config::Config;
pub use domain::{ClosedTrade, Execution, OrderId, Side, Symbol, TradeResult};
pub use engine::{summarize, MatchReport, OpenLot, SummaryStats, TradeMatcher, UnmatchedSell};
pub use error::AppError;
pub use ingest::{parse_tradebook, ParsedTradebook, TradebookError};
pub use insights::{InsightCard, InsightKind, TradingCoach};
