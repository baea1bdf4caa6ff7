//! Aggregate summary statistics over a closed-trade collection.

use crate::domain::{ClosedTrade, TradeResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one matching run.
///
/// Recomputed on demand from the closed-trade collection; never persisted
/// independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SummaryStats {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    /// Percentage of winning trades; 0.0 when there are no trades.
    pub win_rate: f64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_pnl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_profit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub max_loss: Decimal,
    pub avg_hold_hours: f64,
    /// Sum of entry values across all closed trades.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_volume: Decimal,
}

/// Compute summary statistics for a closed-trade collection.
///
/// Pure function of its input. An empty collection yields the zero-valued
/// struct rather than an error or a division by zero.
pub fn summarize(closed_trades: &[ClosedTrade]) -> SummaryStats {
    if closed_trades.is_empty() {
        return SummaryStats::default();
    }

    let total_trades = closed_trades.len();
    let winning_trades = closed_trades
        .iter()
        .filter(|t| t.trade_result == TradeResult::Win)
        .count();
    let losing_trades = total_trades - winning_trades;

    let total_pnl: Decimal = closed_trades.iter().map(|t| t.gross_pnl).sum();
    let avg_pnl = total_pnl / Decimal::from(total_trades as u64);
    let max_profit = closed_trades
        .iter()
        .map(|t| t.gross_pnl)
        .max()
        .unwrap_or(Decimal::ZERO);
    let max_loss = closed_trades
        .iter()
        .map(|t| t.gross_pnl)
        .min()
        .unwrap_or(Decimal::ZERO);
    let avg_hold_hours =
        closed_trades.iter().map(|t| t.hold_hours).sum::<f64>() / total_trades as f64;
    let total_volume: Decimal = closed_trades.iter().map(|t| t.entry_value).sum();
    let win_rate = winning_trades as f64 / total_trades as f64 * 100.0;

    SummaryStats {
        total_trades,
        winning_trades,
        losing_trades,
        win_rate,
        total_pnl,
        avg_pnl,
        max_profit,
        max_loss,
        avg_hold_hours,
        total_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderId, Symbol};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    // A 10-unit trade whose gross P&L comes out to `pnl`.
    fn trade_with_pnl(pnl: &str) -> ClosedTrade {
        let entry = d("1000");
        let exit = entry + d(pnl) / d("10");
        ClosedTrade::from_match(
            Symbol::new("RELIANCE".to_string()),
            ts(10),
            ts(14),
            entry,
            exit,
            d("10"),
            OrderId::new("e".to_string()),
            OrderId::new("x".to_string()),
        )
    }

    #[test]
    fn test_summary_known_pnl_sequence() {
        let trades = vec![
            trade_with_pnl("500"),
            trade_with_pnl("-200"),
            trade_with_pnl("600"),
            trade_with_pnl("-300"),
        ];

        let stats = summarize(&trades);
        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.winning_trades, 2);
        assert_eq!(stats.losing_trades, 2);
        assert!((stats.win_rate - 50.0).abs() < 1e-9);
        assert_eq!(stats.total_pnl, d("600"));
        assert_eq!(stats.avg_pnl, d("150"));
        assert_eq!(stats.max_profit, d("600"));
        assert_eq!(stats.max_loss, d("-300"));
    }

    #[test]
    fn test_empty_input_is_zero_valued_not_an_error() {
        let stats = summarize(&[]);
        assert_eq!(stats, SummaryStats::default());
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate, 0.0);
        assert_eq!(stats.total_pnl, Decimal::ZERO);
    }

    #[test]
    fn test_zero_pnl_counts_as_loss() {
        let trades = vec![trade_with_pnl("0"), trade_with_pnl("100")];
        let stats = summarize(&trades);
        assert_eq!(stats.winning_trades, 1);
        assert_eq!(stats.losing_trades, 1);
        assert!((stats.win_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_total_volume_sums_entry_values() {
        let trades = vec![trade_with_pnl("100"), trade_with_pnl("-100")];
        let stats = summarize(&trades);
        // Two trades, each entered at 1000 x 10 units.
        assert_eq!(stats.total_volume, d("20000"));
    }

    #[test]
    fn test_avg_hold_hours() {
        let trades = vec![trade_with_pnl("100"), trade_with_pnl("200")];
        let stats = summarize(&trades);
        assert!((stats.avg_hold_hours - 4.0).abs() < 1e-9);
    }
}
