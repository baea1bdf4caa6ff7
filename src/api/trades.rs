use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDateTime;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::ClosedTrade;
use crate::engine::UnmatchedSell;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesResponse {
    pub trades: Vec<ClosedTradeDto>,
    pub unmatched_sells: Vec<UnmatchedSellDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTradeDto {
    pub symbol: String,
    pub entry_datetime: NaiveDateTime,
    pub exit_datetime: NaiveDateTime,
    pub entry_price: f64,
    pub exit_price: f64,
    pub quantity: f64,
    pub entry_order_id: String,
    pub exit_order_id: String,
    pub gross_pnl: f64,
    pub pnl_percentage: f64,
    pub hold_hours: f64,
    pub trade_result: String,
    pub entry_value: f64,
    pub exit_value: f64,
}

impl From<&ClosedTrade> for ClosedTradeDto {
    fn from(trade: &ClosedTrade) -> Self {
        ClosedTradeDto {
            symbol: trade.symbol.as_str().to_string(),
            entry_datetime: trade.entry_datetime,
            exit_datetime: trade.exit_datetime,
            entry_price: trade.entry_price.to_f64().unwrap_or(0.0),
            exit_price: trade.exit_price.to_f64().unwrap_or(0.0),
            quantity: trade.quantity.to_f64().unwrap_or(0.0),
            entry_order_id: trade.entry_order_id.as_str().to_string(),
            exit_order_id: trade.exit_order_id.as_str().to_string(),
            gross_pnl: trade.gross_pnl.to_f64().unwrap_or(0.0),
            pnl_percentage: trade.pnl_percentage.to_f64().unwrap_or(0.0),
            hold_hours: trade.hold_hours,
            trade_result: trade.trade_result.to_string(),
            entry_value: trade.entry_value.to_f64().unwrap_or(0.0),
            exit_value: trade.exit_value.to_f64().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedSellDto {
    pub symbol: String,
    pub timestamp: NaiveDateTime,
    pub order_id: String,
    pub price: f64,
    pub unmatched_quantity: f64,
}

impl From<&UnmatchedSell> for UnmatchedSellDto {
    fn from(unmatched: &UnmatchedSell) -> Self {
        UnmatchedSellDto {
            symbol: unmatched.symbol.as_str().to_string(),
            timestamp: unmatched.timestamp,
            order_id: unmatched.order_id.as_str().to_string(),
            price: unmatched.price.to_f64().unwrap_or(0.0),
            unmatched_quantity: unmatched.unmatched_quantity.to_f64().unwrap_or(0.0),
        }
    }
}

pub async fn get_trades(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<TradesResponse>, AppError> {
    let analysis = state
        .get_analysis(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("tradebook {id}")))?;

    let trades = analysis
        .report
        .closed_trades
        .iter()
        .map(ClosedTradeDto::from)
        .collect();
    let unmatched_sells = analysis
        .report
        .unmatched_sells
        .iter()
        .map(UnmatchedSellDto::from)
        .collect();

    Ok(Json(TradesResponse {
        trades,
        unmatched_sells,
    }))
}
