pub mod health;
pub mod insights;
pub mod summary;
pub mod tradebook;
pub mod trades;

use crate::config::Config;
use crate::engine::{MatchReport, SummaryStats};
use crate::insights::InsightCard;
use axum::routing::{get, post};
use axum::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

/// One analyzed tradebook upload.
///
/// Immutable once stored; the read endpoints serve it as-is.
#[derive(Debug)]
pub struct Analysis {
    /// Executions that survived normalization.
    pub executions: usize,
    /// Rows dropped during normalization.
    pub skipped_rows: usize,
    pub report: MatchReport,
    pub summary: SummaryStats,
    pub insights: Vec<InsightCard>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    analyses: Arc<RwLock<HashMap<Uuid, Arc<Analysis>>>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            analyses: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Store an analysis under a fresh id.
    pub async fn insert_analysis(&self, analysis: Analysis) -> Uuid {
        let id = Uuid::new_v4();
        self.analyses.write().await.insert(id, Arc::new(analysis));
        id
    }

    pub async fn get_analysis(&self, id: &Uuid) -> Option<Arc<Analysis>> {
        self.analyses.read().await.get(id).cloned()
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/tradebook", post(tradebook::upload_tradebook))
        .route("/v1/tradebook/:id/trades", get(trades::get_trades))
        .route("/v1/tradebook/:id/summary", get(summary::get_summary))
        .route("/v1/tradebook/:id/insights", get(insights::get_insights))
        .layer(cors)
        .with_state(state)
}
