use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::{Analysis, AppState};
use crate::engine::{summarize, TradeMatcher};
use crate::error::AppError;
use crate::ingest::parse_tradebook;
use crate::insights::TradingCoach;

use super::summary::SummaryDto;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub tradebook_id: Uuid,
    /// Executions that survived normalization.
    pub executions: usize,
    /// Rows dropped during normalization.
    pub skipped_rows: usize,
    pub closed_trades: usize,
    pub unmatched_sells: usize,
    pub summary: SummaryDto,
}

/// Upload a tradebook CSV and run the full analysis pipeline:
/// normalize, match, summarize, generate insights.
pub async fn upload_tradebook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    if body.len() > state.config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "tradebook exceeds {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let parsed = parse_tradebook(body.as_ref())?;
    let report = TradeMatcher::match_executions(&parsed.executions);
    let summary = summarize(&report.closed_trades);
    let insights =
        TradingCoach::new(state.config.swing_hold_hours).generate_insights(&report.closed_trades);

    let executions = parsed.executions.len();
    let skipped_rows = parsed.skipped_rows;
    let closed_trades = report.closed_trades.len();
    let unmatched_sells = report.unmatched_sells.len();

    tracing::info!(
        executions,
        skipped_rows,
        closed_trades,
        unmatched_sells,
        "analyzed tradebook upload"
    );

    let summary_dto = SummaryDto::from(&summary);
    let id = state
        .insert_analysis(Analysis {
            executions,
            skipped_rows,
            report,
            summary,
            insights,
        })
        .await;

    Ok(Json(UploadResponse {
        tradebook_id: id,
        executions,
        skipped_rows,
        closed_trades,
        unmatched_sells,
        summary: summary_dto,
    }))
}
