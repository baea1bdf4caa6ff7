//! Tradebook CSV parsing and normalization.
//!
//! Turns a raw brokerage export into validated, time-ordered executions.
//! Rows that cannot be normalized are skipped and counted, not fatal; a
//! header missing a required column is fatal.

use crate::domain::{sort_executions_chronological, Execution, OrderId, Side, Symbol};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Columns every tradebook export must carry.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "symbol",
    "trade_date",
    "order_execution_time",
    "trade_type",
    "quantity",
    "price",
    "order_id",
];

#[derive(Debug, Error)]
pub enum TradebookError {
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("csv parse error: {0}")]
    Csv(String),
}

/// Result of parsing one tradebook upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTradebook {
    /// Executions sorted by timestamp ascending (stable on ties).
    pub executions: Vec<Execution>,
    /// Rows dropped during normalization (blank fields, bad numbers,
    /// unknown trade type, unparseable timestamp).
    pub skipped_rows: usize,
}

#[derive(Debug, serde::Deserialize)]
struct Row {
    symbol: Option<String>,
    trade_date: Option<String>,
    order_execution_time: Option<String>,
    trade_type: Option<String>,
    quantity: Option<String>,
    price: Option<String>,
    order_id: Option<String>,
}

/// Parse and normalize a tradebook CSV.
pub fn parse_tradebook(input: impl std::io::Read) -> Result<ParsedTradebook, TradebookError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| TradebookError::Csv(e.to_string()))?;
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h.trim() == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(TradebookError::MissingColumns(missing));
    }

    let mut executions = Vec::new();
    let mut skipped_rows = 0usize;

    for (index, record) in reader.deserialize::<Row>().enumerate() {
        let row = record.map_err(|e| TradebookError::Csv(e.to_string()))?;
        match normalize_row(row) {
            Some(execution) => executions.push(execution),
            None => {
                skipped_rows += 1;
                // +2: 1-based, plus the header line.
                tracing::warn!(line = index + 2, "skipping unusable tradebook row");
            }
        }
    }

    sort_executions_chronological(&mut executions);

    Ok(ParsedTradebook {
        executions,
        skipped_rows,
    })
}

fn normalize_row(row: Row) -> Option<Execution> {
    let symbol = non_blank(row.symbol)?.to_uppercase();
    // Not carried on the execution, but a row without it is incomplete.
    non_blank(row.trade_date)?;
    let side = parse_side(&non_blank(row.trade_type)?)?;
    let quantity = parse_positive_decimal(&non_blank(row.quantity)?)?;
    let price = parse_positive_decimal(&non_blank(row.price)?)?;
    let order_id = non_blank(row.order_id)?;
    let timestamp = parse_timestamp(&non_blank(row.order_execution_time)?)?;

    Some(Execution::new(
        Symbol::new(symbol),
        timestamp,
        side,
        quantity,
        price,
        OrderId::new(order_id),
    ))
}

fn non_blank(field: Option<String>) -> Option<String> {
    let value = field?.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_side(raw: &str) -> Option<Side> {
    match raw.to_lowercase().as_str() {
        "buy" => Some(Side::Buy),
        "sell" => Some(Side::Sell),
        _ => None,
    }
}

fn parse_positive_decimal(raw: &str) -> Option<Decimal> {
    let value = Decimal::from_str(raw).ok()?;
    if value > Decimal::ZERO {
        Some(value)
    } else {
        None
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S"))
        .ok()
}
