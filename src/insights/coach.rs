//! Coach-style insight cards derived from matched trades.
//!
//! Each card pairs a headline metric set with a plain-language observation
//! and a suggested action. All analysis reads the closed-trade collection
//! only; no market data is consulted.

use crate::domain::{ClosedTrade, Symbol, TradeResult};
use chrono::Timelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;

/// Entry before this hour counts as a morning trade.
const MORNING_ENTRY_HOUR: u32 = 10;
/// Entry at or after this hour counts as a late entry.
const LATE_ENTRY_HOUR: u32 = 14;
/// Holds under this many hours count as quick exits.
const QUICK_EXIT_HOURS: f64 = 2.0;
/// A symbol needs at least this many trades to rank in the focus card.
const MIN_TRADES_PER_SYMBOL: usize = 2;

/// Card category, one per generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    PerformanceSummary,
    WinningPatterns,
    TopMistakes,
    BehavioralBias,
    WhatIfAnalysis,
    StrategyLeaderboard,
    TimePerformance,
    StockFocus,
}

/// One coach insight card.
///
/// The envelope is fixed-shape; `metrics` varies by card kind and stays a
/// JSON object for presentation layers to pick over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightCard {
    pub title: String,
    pub kind: InsightKind,
    pub insight: String,
    pub action: String,
    pub metrics: serde_json::Value,
}

/// Generates the eight coach insight cards from a closed-trade collection.
pub struct TradingCoach {
    /// Hold-hours threshold separating intraday from swing trades.
    swing_hold_hours: f64,
}

impl TradingCoach {
    pub fn new(swing_hold_hours: f64) -> Self {
        Self { swing_hold_hours }
    }

    /// Generate all insight cards. Empty input yields no cards.
    pub fn generate_insights(&self, trades: &[ClosedTrade]) -> Vec<InsightCard> {
        if trades.is_empty() {
            return Vec::new();
        }

        vec![
            self.performance_summary(trades),
            self.winning_patterns(trades),
            self.top_mistakes(trades),
            self.behavioral_bias(trades),
            self.what_if_analysis(trades),
            self.strategy_leaderboard(trades),
            self.time_performance(trades),
            self.stock_focus(trades),
        ]
    }

    fn performance_summary(&self, trades: &[ClosedTrade]) -> InsightCard {
        let total_pnl = total_pnl(trades);
        let win_rate = win_rate(trades);
        let avg_hold = mean(trades.iter().map(|t| t.hold_hours));

        let by_symbol = pnl_by_symbol(trades);
        let best = by_symbol.iter().max_by_key(|(_, pnl)| **pnl);
        let worst = by_symbol.iter().min_by_key(|(_, pnl)| **pnl);

        let swing_pnl: Decimal = trades
            .iter()
            .filter(|t| t.hold_hours > self.swing_hold_hours)
            .map(|t| t.gross_pnl)
            .sum();
        let intraday_pnl = total_pnl - swing_pnl;
        let best_strategy = if swing_pnl > intraday_pnl {
            "swing trades"
        } else {
            "intraday trades"
        };

        InsightCard {
            title: "Performance Summary".to_string(),
            kind: InsightKind::PerformanceSummary,
            insight: format!("You earned most from {best_strategy}."),
            action: format!("Focus more on {best_strategy} to maximize profits."),
            metrics: json!({
                "net_pnl": decimal_f64(total_pnl),
                "win_rate": win_rate,
                "avg_hold_time": format_hold(avg_hold),
                "best_stock": best.map(|(s, _)| s.as_str()),
                "best_stock_pnl": best.map(|(_, p)| decimal_f64(*p)),
                "worst_stock": worst.map(|(s, _)| s.as_str()),
                "worst_stock_pnl": worst.map(|(_, p)| decimal_f64(*p)),
            }),
        }
    }

    fn winning_patterns(&self, trades: &[ClosedTrade]) -> InsightCard {
        let early: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.entry_datetime.hour() < MORNING_ENTRY_HOUR)
            .collect();

        if !early.is_empty() {
            let early_win_rate = win_rate_refs(&early);
            let early_avg_roi = mean(early.iter().map(|t| pnl_pct_f64(t)));
            let short_holds: Vec<&ClosedTrade> =
                trades.iter().filter(|t| t.hold_hours < 3.0).collect();
            let short_win_rate = if short_holds.is_empty() {
                0.0
            } else {
                win_rate_refs(&short_holds)
            };

            return InsightCard {
                title: "Winning Patterns".to_string(),
                kind: InsightKind::WinningPatterns,
                insight: format!(
                    "{} trades followed this pattern with {:.0}% success.",
                    early.len(),
                    early_win_rate
                ),
                action: "Schedule more trades in the morning window for higher success rates."
                    .to_string(),
                metrics: json!({
                    "entry_time": format!("Before {MORNING_ENTRY_HOUR}:00"),
                    "hold_duration": "<3 hours",
                    "win_rate": early_win_rate.max(short_win_rate),
                    "avg_roi": early_avg_roi,
                    "trade_count": early.len(),
                }),
            };
        }

        // No morning entries: fall back to the winners' typical hold.
        let winners: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.trade_result == TradeResult::Win)
            .collect();
        let median_hold = median(winners.iter().map(|t| t.hold_hours).collect());

        InsightCard {
            title: "Winning Patterns".to_string(),
            kind: InsightKind::WinningPatterns,
            insight: format!("Optimal hold time appears to be around {median_hold:.1} hours."),
            action: "Target similar hold durations for future trades.".to_string(),
            metrics: json!({
                "hold_duration": format!("~{median_hold:.1} hours"),
                "win_rate": if winners.is_empty() { 0.0 } else { 100.0 },
                "avg_roi": mean(winners.iter().map(|t| pnl_pct_f64(t))),
                "trade_count": winners.len(),
            }),
        }
    }

    fn top_mistakes(&self, trades: &[ClosedTrade]) -> InsightCard {
        let mut mistakes: Vec<(String, Decimal, usize)> = Vec::new();

        let late: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.entry_datetime.hour() >= LATE_ENTRY_HOUR)
            .collect();
        let late_loss: Decimal = late
            .iter()
            .filter(|t| t.trade_result == TradeResult::Loss)
            .map(|t| t.gross_pnl)
            .sum();
        if late_loss < Decimal::ZERO {
            mistakes.push((
                format!("Entry after {LATE_ENTRY_HOUR}:00"),
                late_loss.abs(),
                late.len(),
            ));
        }

        let long_losers: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.hold_hours > self.swing_hold_hours && t.trade_result == TradeResult::Loss)
            .collect();
        if !long_losers.is_empty() {
            let impact: Decimal = long_losers.iter().map(|t| t.gross_pnl).sum();
            mistakes.push((
                "Holding losses too long".to_string(),
                impact.abs(),
                long_losers.len(),
            ));
        }

        // Bottom decile of gross P&L: the outsized losers.
        let decile = pnl_decile_threshold(trades);
        let large_losses: Vec<&ClosedTrade> =
            trades.iter().filter(|t| t.gross_pnl < decile).collect();
        if !large_losses.is_empty() {
            let impact: Decimal = large_losses.iter().map(|t| t.gross_pnl).sum();
            mistakes.push((
                "Large position sizes on losers".to_string(),
                impact.abs(),
                large_losses.len(),
            ));
        }

        mistakes.sort_by(|a, b| b.1.cmp(&a.1));
        mistakes.truncate(3);
        let total_impact: Decimal = mistakes.iter().map(|(_, impact, _)| *impact).sum();

        InsightCard {
            title: "Top Mistakes to Avoid".to_string(),
            kind: InsightKind::TopMistakes,
            insight: format!("These patterns cost you {:.0}.", decimal_f64(total_impact)),
            action: "Set rules to avoid these specific scenarios in future trades.".to_string(),
            metrics: json!({
                "mistakes": mistakes
                    .iter()
                    .map(|(label, impact, frequency)| json!({
                        "mistake": label,
                        "impact": decimal_f64(*impact),
                        "frequency": frequency,
                    }))
                    .collect::<Vec<_>>(),
                "total_impact": decimal_f64(total_impact),
            }),
        }
    }

    fn behavioral_bias(&self, trades: &[ClosedTrade]) -> InsightCard {
        let mut biases: Vec<String> = Vec::new();

        // Re-entering the same symbol shortly after a loss.
        let mut by_exit: Vec<&ClosedTrade> = trades.iter().collect();
        by_exit.sort_by_key(|t| t.exit_datetime);
        let revenge: Vec<&ClosedTrade> = by_exit
            .windows(2)
            .filter(|pair| {
                let (prev, curr) = (pair[0], pair[1]);
                prev.symbol == curr.symbol
                    && prev.trade_result == TradeResult::Loss
                    && (curr.entry_datetime - prev.exit_datetime).num_seconds() < 7200
            })
            .map(|pair| pair[1])
            .collect();
        if !revenge.is_empty() {
            let fail_rate = 100.0 - win_rate_refs(&revenge);
            biases.push(format!(
                "Revenge Trading: Re-entered same stock after loss -> {fail_rate:.0}% failed"
            ));
        }

        let winners: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.trade_result == TradeResult::Win)
            .collect();
        if !winners.is_empty() {
            let quick_exits = winners.iter().filter(|t| t.hold_hours < 1.0).count();
            if quick_exits as f64 > winners.len() as f64 * 0.3 {
                biases.push(
                    "Premature Profit Taking: Exited winners too early -> Check what-if analysis"
                        .to_string(),
                );
            }
        }

        if trades.len() > 5 && longest_win_streak(trades) >= 3 {
            biases.push(
                "Position Sizing Creep: After wins, check if position sizes increased risk"
                    .to_string(),
            );
        }

        InsightCard {
            title: "Behavioral Bias Report".to_string(),
            kind: InsightKind::BehavioralBias,
            insight: format!(
                "Detected {} potential behavioral patterns affecting performance.",
                biases.len()
            ),
            action: "Set systematic rules to counteract these emotional trading patterns."
                .to_string(),
            metrics: json!({ "biases": biases }),
        }
    }

    fn what_if_analysis(&self, trades: &[ClosedTrade]) -> InsightCard {
        let mut suggestions: Vec<String> = Vec::new();
        let mut total_missed = 0.0;

        let quick_winners: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.trade_result == TradeResult::Win && t.hold_hours < QUICK_EXIT_HOURS)
            .collect();
        if !quick_winners.is_empty() {
            let avg_quick_profit = mean(quick_winners.iter().map(|t| decimal_f64(t.gross_pnl)));
            let estimated_missed = quick_winners.len() as f64 * avg_quick_profit * 0.3;
            total_missed += estimated_missed;
            suggestions.push(format!(
                "If you had held winners 30 mins longer -> +{estimated_missed:.0}"
            ));
        }

        let late_losses: Decimal = trades
            .iter()
            .filter(|t| {
                t.entry_datetime.hour() >= LATE_ENTRY_HOUR && t.trade_result == TradeResult::Loss
            })
            .map(|t| t.gross_pnl)
            .sum();
        if late_losses < Decimal::ZERO {
            suggestions.push(format!(
                "If you avoided post-{LATE_ENTRY_HOUR}:00 entries -> +{:.0} saved",
                decimal_f64(late_losses.abs())
            ));
        }

        let winners_pnl: Decimal = trades
            .iter()
            .filter(|t| t.gross_pnl > Decimal::ZERO)
            .map(|t| t.gross_pnl)
            .sum();
        if winners_pnl > Decimal::ZERO {
            let trailing_benefit = decimal_f64(winners_pnl) * 0.15;
            suggestions.push(format!(
                "Trailing stop strategy -> +{trailing_benefit:.0} potential"
            ));
        }

        InsightCard {
            title: "What-If Analysis".to_string(),
            kind: InsightKind::WhatIfAnalysis,
            insight: format!(
                "Potential improvements worth {total_missed:.0} identified across all trades."
            ),
            action: "Implement systematic rules to capture these missed opportunities.".to_string(),
            metrics: json!({
                "suggestions": suggestions,
                "total_opportunity": total_missed,
            }),
        }
    }

    fn strategy_leaderboard(&self, trades: &[ClosedTrade]) -> InsightCard {
        let mut strategies: Vec<(String, f64, f64, &str)> = Vec::new();

        let swing: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.hold_hours > self.swing_hold_hours)
            .collect();
        if !swing.is_empty() {
            strategies.push((
                "Swing: >1d hold".to_string(),
                win_rate_refs(&swing),
                mean(swing.iter().map(|t| pnl_pct_f64(t))),
                "Longer-term positions",
            ));
        }

        let intraday: Vec<&ClosedTrade> = trades.iter().filter(|t| t.hold_hours <= 8.0).collect();
        if !intraday.is_empty() {
            strategies.push((
                "Intraday: <8h hold".to_string(),
                win_rate_refs(&intraday),
                mean(intraday.iter().map(|t| pnl_pct_f64(t))),
                "Same-day trading",
            ));
        }

        let morning: Vec<&ClosedTrade> = trades
            .iter()
            .filter(|t| t.entry_datetime.hour() < 11)
            .collect();
        if !morning.is_empty() {
            strategies.push((
                "Morning: <11AM entry".to_string(),
                win_rate_refs(&morning),
                mean(morning.iter().map(|t| pnl_pct_f64(t))),
                "Early market entry",
            ));
        }

        strategies.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let (insight, action) = match strategies.first() {
            Some((name, rate, _, _)) => (
                format!("Best: {name} ({rate:.0}% win rate)"),
                format!("Double down on {name} setups"),
            ),
            None => (
                "Need more data".to_string(),
                "Collect more trade data".to_string(),
            ),
        };

        InsightCard {
            title: "Strategy Leaderboard".to_string(),
            kind: InsightKind::StrategyLeaderboard,
            insight,
            action,
            metrics: json!({
                "strategies": strategies
                    .iter()
                    .map(|(name, rate, roi, note)| json!({
                        "name": name,
                        "win_rate": rate,
                        "roi": roi,
                        "note": note,
                    }))
                    .collect::<Vec<_>>(),
            }),
        }
    }

    fn time_performance(&self, trades: &[ClosedTrade]) -> InsightCard {
        let mut by_hour: BTreeMap<u32, Vec<&ClosedTrade>> = BTreeMap::new();
        for trade in trades {
            by_hour
                .entry(trade.entry_datetime.hour())
                .or_default()
                .push(trade);
        }

        let hourly: Vec<(u32, f64, f64)> = by_hour
            .iter()
            .map(|(hour, bucket)| {
                (
                    *hour,
                    mean(bucket.iter().map(|t| pnl_pct_f64(t))),
                    win_rate_refs(bucket),
                )
            })
            .collect();

        let best = hourly
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        let worst = hourly
            .iter()
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        match (best, worst) {
            (Some((best_hour, best_roi, best_rate)), Some((worst_hour, worst_roi, worst_rate))) => {
                InsightCard {
                    title: "Time Performance Map".to_string(),
                    kind: InsightKind::TimePerformance,
                    insight: format!(
                        "Best: {}:00-{}:00 (+{:.1}%), Worst: {}:00-{}:00 ({:.1}%)",
                        best_hour,
                        best_hour + 1,
                        best_roi,
                        worst_hour,
                        worst_hour + 1,
                        worst_roi
                    ),
                    action: format!(
                        "Limit new entries during {}:00-{}:00 window for 2 weeks and measure impact.",
                        worst_hour,
                        worst_hour + 1
                    ),
                    metrics: json!({
                        "best_window": {
                            "time": format!("{}:00 - {}:00", best_hour, best_hour + 1),
                            "roi": best_roi,
                            "win_rate": best_rate,
                        },
                        "worst_window": {
                            "time": format!("{}:00 - {}:00", worst_hour, worst_hour + 1),
                            "roi": worst_roi,
                            "win_rate": worst_rate,
                        },
                    }),
                }
            }
            _ => InsightCard {
                title: "Time Performance Map".to_string(),
                kind: InsightKind::TimePerformance,
                insight: "Need more data to identify time-based patterns".to_string(),
                action: "Continue trading to build time-based performance data".to_string(),
                metrics: json!({}),
            },
        }
    }

    fn stock_focus(&self, trades: &[ClosedTrade]) -> InsightCard {
        let mut by_symbol: BTreeMap<&Symbol, Vec<&ClosedTrade>> = BTreeMap::new();
        for trade in trades {
            by_symbol.entry(&trade.symbol).or_default().push(trade);
        }
        by_symbol.retain(|_, bucket| bucket.len() >= MIN_TRADES_PER_SYMBOL);

        let ranked: Vec<(&Symbol, Decimal, f64, usize)> = by_symbol
            .iter()
            .map(|(symbol, bucket)| {
                let pnl: Decimal = bucket.iter().map(|t| t.gross_pnl).sum();
                (*symbol, pnl, win_rate_refs(bucket), bucket.len())
            })
            .collect();

        let champion = ranked.iter().max_by_key(|(_, pnl, _, _)| *pnl);
        let avoid = ranked
            .iter()
            .min_by_key(|(_, pnl, _, _)| *pnl)
            .filter(|(_, pnl, _, _)| *pnl < Decimal::ZERO);

        match champion {
            Some((symbol, pnl, rate, count)) => InsightCard {
                title: "Stock Focus".to_string(),
                kind: InsightKind::StockFocus,
                insight: format!(
                    "Champion: {} ({:.0}, {:.0}% win rate)",
                    symbol,
                    decimal_f64(*pnl),
                    rate
                ),
                action: format!("Increase allocation to {symbol} while maintaining risk management."),
                metrics: json!({
                    "champion_stock": {
                        "symbol": symbol.as_str(),
                        "pnl": decimal_f64(*pnl),
                        "win_rate": rate,
                        "trade_count": count,
                    },
                    "avoid_stock": avoid.map(|(s, p, r, c)| json!({
                        "symbol": s.as_str(),
                        "pnl": decimal_f64(*p),
                        "win_rate": r,
                        "trade_count": c,
                    })),
                }),
            },
            None => InsightCard {
                title: "Stock Focus".to_string(),
                kind: InsightKind::StockFocus,
                insight: "Need more trades per stock to identify consistent performers".to_string(),
                action: "Focus on 3-5 stocks to build deeper performance insights".to_string(),
                metrics: json!({}),
            },
        }
    }
}

fn total_pnl(trades: &[ClosedTrade]) -> Decimal {
    trades.iter().map(|t| t.gross_pnl).sum()
}

fn win_rate(trades: &[ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades
        .iter()
        .filter(|t| t.trade_result == TradeResult::Win)
        .count();
    wins as f64 / trades.len() as f64 * 100.0
}

fn win_rate_refs(trades: &[&ClosedTrade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades
        .iter()
        .filter(|t| t.trade_result == TradeResult::Win)
        .count();
    wins as f64 / trades.len() as f64 * 100.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let collected: Vec<f64> = values.collect();
    if collected.is_empty() {
        return 0.0;
    }
    collected.iter().sum::<f64>() / collected.len() as f64
}

fn median(mut values: Vec<f64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values[values.len() / 2]
}

fn pnl_pct_f64(trade: &ClosedTrade) -> f64 {
    decimal_f64(trade.pnl_percentage)
}

fn decimal_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn pnl_by_symbol(trades: &[ClosedTrade]) -> BTreeMap<&Symbol, Decimal> {
    let mut by_symbol: BTreeMap<&Symbol, Decimal> = BTreeMap::new();
    for trade in trades {
        *by_symbol.entry(&trade.symbol).or_insert(Decimal::ZERO) += trade.gross_pnl;
    }
    by_symbol
}

/// Bottom-decile gross P&L cut, over the trades sorted ascending.
fn pnl_decile_threshold(trades: &[ClosedTrade]) -> Decimal {
    let mut pnls: Vec<Decimal> = trades.iter().map(|t| t.gross_pnl).collect();
    pnls.sort();
    let index = (pnls.len() - 1) / 10;
    pnls[index]
}

/// Longest run of consecutive wins in entry order.
fn longest_win_streak(trades: &[ClosedTrade]) -> usize {
    let mut by_entry: Vec<&ClosedTrade> = trades.iter().collect();
    by_entry.sort_by_key(|t| t.entry_datetime);

    let mut longest = 0;
    let mut current = 0;
    for trade in by_entry {
        if trade.trade_result == TradeResult::Win {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

fn format_hold(hours: f64) -> String {
    let days = (hours / 24.0) as u64;
    let whole_hours = (hours % 24.0) as u64;
    let minutes = ((hours % 1.0) * 60.0) as u64;
    format!("{days}d {whole_hours}h {minutes}m")
}
