//! Coaching insight generation over matched trades.

pub mod coach;

pub use coach::{InsightCard, InsightKind, TradingCoach};
