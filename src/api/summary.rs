use axum::extract::{Path, State};
use axum::Json;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::engine::SummaryStats;
use crate::error::AppError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub avg_pnl: f64,
    pub max_profit: f64,
    pub max_loss: f64,
    pub avg_hold_hours: f64,
    pub total_volume: f64,
}

impl From<&SummaryStats> for SummaryDto {
    fn from(stats: &SummaryStats) -> Self {
        SummaryDto {
            total_trades: stats.total_trades,
            winning_trades: stats.winning_trades,
            losing_trades: stats.losing_trades,
            win_rate: stats.win_rate,
            total_pnl: stats.total_pnl.to_f64().unwrap_or(0.0),
            avg_pnl: stats.avg_pnl.to_f64().unwrap_or(0.0),
            max_profit: stats.max_profit.to_f64().unwrap_or(0.0),
            max_loss: stats.max_loss.to_f64().unwrap_or(0.0),
            avg_hold_hours: stats.avg_hold_hours,
            total_volume: stats.total_volume.to_f64().unwrap_or(0.0),
        }
    }
}

pub async fn get_summary(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<SummaryDto>, AppError> {
    let analysis = state
        .get_analysis(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("tradebook {id}")))?;

    Ok(Json(SummaryDto::from(&analysis.summary)))
}
