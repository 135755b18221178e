//! Dashboard metrics endpoint

use axum::{extract::State, Json};
use deedlead_common::db::metrics::lead_metrics;
use deedlead_common::db::LeadMetrics;

use crate::{ApiError, ApiResult, AppState};

/// GET /api/metrics
pub async fn get_metrics(State(state): State<AppState>) -> ApiResult<Json<LeadMetrics>> {
    lead_metrics(&state.db)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_common("Failed to fetch metrics", e))
}
