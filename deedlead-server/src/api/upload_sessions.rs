//! Upload session history endpoints

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use deedlead_common::db::{upload_sessions, UploadSession};
use serde::{Deserialize, Serialize};

use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SessionListParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    pub upload_sessions: Vec<UploadSession>,
}

/// GET /api/upload-sessions
pub async fn list_upload_sessions(
    State(state): State<AppState>,
    params: Result<Query<SessionListParams>, QueryRejection>,
) -> ApiResult<Json<SessionListResponse>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let sessions = upload_sessions::list_sessions(&state.db, limit)
        .await
        .map_err(|e| ApiError::from_common("Failed to fetch upload sessions", e))?;

    Ok(Json(SessionListResponse {
        upload_sessions: sessions,
    }))
}

/// GET /api/upload-sessions/:id
pub async fn get_upload_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<UploadSession>> {
    upload_sessions::get_session(&state.db, &id)
        .await
        .map_err(|e| ApiError::from_common("Failed to fetch upload session", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Upload session not found".to_string()))
}
