//! Closed round-trip trade emitted by the FIFO matcher.

use crate::domain::{OrderId, Symbol};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Win/loss classification of a closed trade.
///
/// Zero P&L classifies as Loss; there is no neutral category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeResult {
    Win,
    Loss,
}

impl TradeResult {
    /// Classify a gross P&L figure.
    pub fn from_pnl(gross_pnl: Decimal) -> Self {
        if gross_pnl > Decimal::ZERO {
            TradeResult::Win
        } else {
            TradeResult::Loss
        }
    }
}

impl std::fmt::Display for TradeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeResult::Win => write!(f, "win"),
            TradeResult::Loss => write!(f, "loss"),
        }
    }
}

/// One closed round-trip trade: a single FIFO match event.
///
/// A sell that spans several open lots produces several of these, one per
/// lot consumed (or partially consumed). Immutable once emitted; all derived
/// metrics are computed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub symbol: Symbol,
    pub entry_datetime: NaiveDateTime,
    pub exit_datetime: NaiveDateTime,
    #[serde(with = "rust_decimal::serde::float")]
    pub entry_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub exit_price: Decimal,
    /// Matched quantity for this event.
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub entry_order_id: OrderId,
    pub exit_order_id: OrderId,
    /// (exit_price - entry_price) * quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_pnl: Decimal,
    /// (exit_price - entry_price) / entry_price * 100.
    #[serde(with = "rust_decimal::serde::float")]
    pub pnl_percentage: Decimal,
    /// Fractional hours between entry and exit.
    pub hold_hours: f64,
    pub trade_result: TradeResult,
    /// entry_price * quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub entry_value: Decimal,
    /// exit_price * quantity.
    #[serde(with = "rust_decimal::serde::float")]
    pub exit_value: Decimal,
}

impl ClosedTrade {
    /// Build a closed trade from a matched (lot, sell) pair.
    #[allow(clippy::too_many_arguments)]
    pub fn from_match(
        symbol: Symbol,
        entry_datetime: NaiveDateTime,
        exit_datetime: NaiveDateTime,
        entry_price: Decimal,
        exit_price: Decimal,
        quantity: Decimal,
        entry_order_id: OrderId,
        exit_order_id: OrderId,
    ) -> Self {
        let gross_pnl = (exit_price - entry_price) * quantity;
        let pnl_percentage = (exit_price - entry_price) / entry_price * Decimal::ONE_HUNDRED;
        let hold_seconds = (exit_datetime - entry_datetime).num_seconds();
        let hold_hours = hold_seconds as f64 / 3600.0;
        let trade_result = TradeResult::from_pnl(gross_pnl);
        let entry_value = entry_price * quantity;
        let exit_value = exit_price * quantity;

        ClosedTrade {
            symbol,
            entry_datetime,
            exit_datetime,
            entry_price,
            exit_price,
            quantity,
            entry_order_id,
            exit_order_id,
            gross_pnl,
            pnl_percentage,
            hold_hours,
            trade_result,
            entry_value,
            exit_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ts(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn trade(entry_price: &str, exit_price: &str, quantity: &str) -> ClosedTrade {
        ClosedTrade::from_match(
            Symbol::new("RELIANCE".to_string()),
            ts(10, 0),
            ts(14, 0),
            d(entry_price),
            d(exit_price),
            d(quantity),
            OrderId::new("entry-1".to_string()),
            OrderId::new("exit-1".to_string()),
        )
    }

    #[test]
    fn test_metrics_computed_at_construction() {
        let t = trade("150", "155", "100");

        assert_eq!(t.gross_pnl, d("500"));
        assert_eq!(t.entry_value, d("15000"));
        assert_eq!(t.exit_value, d("15500"));
        assert_eq!(t.trade_result, TradeResult::Win);
        assert!((t.hold_hours - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_pnl_percentage() {
        let t = trade("100", "110", "10");
        assert_eq!(t.pnl_percentage, d("10"));

        let t = trade("200", "190", "10");
        assert_eq!(t.pnl_percentage, d("-5"));
    }

    #[test]
    fn test_zero_pnl_classifies_as_loss() {
        // Boundary rule: break-even is a loss, never a win.
        let t = trade("150", "150", "100");
        assert_eq!(t.gross_pnl, Decimal::ZERO);
        assert_eq!(t.trade_result, TradeResult::Loss);
    }

    #[test]
    fn test_negative_pnl_classifies_as_loss() {
        let t = trade("150", "140", "100");
        assert_eq!(t.gross_pnl, d("-1000"));
        assert_eq!(t.trade_result, TradeResult::Loss);
    }

    #[test]
    fn test_fractional_hold_hours() {
        let t = ClosedTrade::from_match(
            Symbol::new("TCS".to_string()),
            ts(10, 0),
            ts(10, 30),
            d("100"),
            d("101"),
            d("5"),
            OrderId::new("e".to_string()),
            OrderId::new("x".to_string()),
        );
        assert!((t.hold_hours - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_trade_result_serializes_lowercase() {
        let t = trade("150", "155", "100");
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["trade_result"], "win");
    }
}
