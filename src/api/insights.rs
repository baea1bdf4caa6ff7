use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::api::AppState;
use crate::error::AppError;
use crate::insights::InsightCard;

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub insights: Vec<InsightCard>,
}

pub async fn get_insights(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<InsightsResponse>, AppError> {
    let analysis = state
        .get_analysis(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("tradebook {id}")))?;

    Ok(Json(InsightsResponse {
        insights: analysis.insights.clone(),
    }))
}
