//! Call log endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    Json,
};
use deedlead_common::db::call_logs::{self, NewCallLog};
use deedlead_common::db::CallLog;
use deedlead_common::import::convert::parse_date;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{ApiError, ApiResult, AppState};

const DEFAULT_CALL_LOG_LIMIT: i64 = 50;

/// Query parameters for GET /api/call-logs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogParams {
    pub limit: Option<i64>,
    pub lead_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogListResponse {
    pub call_logs: Vec<CallLog>,
}

/// GET /api/call-logs
pub async fn list_call_logs(
    State(state): State<AppState>,
    params: Result<Query<CallLogParams>, QueryRejection>,
) -> ApiResult<Json<CallLogListResponse>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_CALL_LOG_LIMIT).max(1);
    let lead_id = params.lead_id.as_deref().filter(|id| !id.is_empty());

    let call_logs = call_logs::list_call_logs(&state.db, lead_id, limit)
        .await
        .map_err(|e| ApiError::from_common("Failed to fetch call logs", e))?;

    Ok(Json(CallLogListResponse { call_logs }))
}

/// Body for POST /api/call-logs
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCallLogRequest {
    pub lead_id: Option<String>,
    pub user_id: Option<String>,
    pub outcome: Option<String>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub follow_up_date: Option<String>,
}

fn required(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl CreateCallLogRequest {
    fn into_new_call_log(self) -> ApiResult<NewCallLog> {
        let (Some(lead_id), Some(user_id), Some(outcome)) = (
            required(self.lead_id),
            required(self.user_id),
            required(self.outcome),
        ) else {
            return Err(ApiError::BadRequest("Missing required fields".to_string()));
        };

        let follow_up_date = match self.follow_up_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                parse_date(raw)
                    .ok_or_else(|| ApiError::BadRequest(format!("Invalid followUpDate: {}", raw)))?,
            ),
        };

        Ok(NewCallLog {
            lead_id,
            user_id,
            outcome,
            duration: self.duration,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            follow_up_date,
        })
    }
}

/// POST /api/call-logs
pub async fn create_call_log(
    State(state): State<AppState>,
    request: Result<Json<CreateCallLogRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CallLog>)> {
    let Json(request) = request?;
    let input = request.into_new_call_log()?;

    let call_log = call_logs::create_call_log(&state.db, &input)
        .await
        .map_err(|e| ApiError::from_common("Failed to create call log", e))?;

    info!("Call logged for lead {}: {}", call_log.lead_id, call_log.outcome);
    Ok((StatusCode::CREATED, Json(call_log)))
}
