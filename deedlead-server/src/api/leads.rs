//! Lead listing and status endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use deedlead_common::db::leads::{self, LeadFilter, LeadSort};
use deedlead_common::db::{Lead, LeadStatus};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::pagination::{calculate_pagination, sanitize_page_size};
use crate::{ApiError, ApiResult, AppState};

/// Query parameters for GET /api/leads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadListParams {
    pub status: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    pub page_size: Option<i64>,
    /// Alias for pageSize that wins when both are given
    pub limit: Option<i64>,
}

fn default_page() -> i64 {
    1
}

impl LeadListParams {
    fn filter(&self) -> LeadFilter {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("all"))
            .map(str::to_string);

        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        LeadFilter { status, search }
    }
}

/// Page metadata returned with a lead listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total_count: i64,
    pub total_pages: i64,
}

#[derive(Debug, Serialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
    pub pagination: PaginationInfo,
}

/// GET /api/leads
pub async fn list_leads(
    State(state): State<AppState>,
    params: Result<Query<LeadListParams>, QueryRejection>,
) -> ApiResult<Json<LeadListResponse>> {
    let Query(params) = params?;
    let filter = params.filter();
    let sort = LeadSort::from_param(params.sort.as_deref());
    let page_size = sanitize_page_size(params.limit.or(params.page_size));

    let total_count = leads::count_leads(&state.db, &filter)
        .await
        .map_err(|e| ApiError::from_common("Failed to fetch leads", e))?;

    let pagination = calculate_pagination(total_count, params.page, page_size);

    let rows = leads::list_leads(&state.db, &filter, sort, pagination.page_size, pagination.offset)
        .await
        .map_err(|e| ApiError::from_common("Failed to fetch leads", e))?;

    debug!(
        "Lead listing: {} of {} (page {}/{})",
        rows.len(),
        total_count,
        pagination.page,
        pagination.total_pages
    );

    Ok(Json(LeadListResponse {
        leads: rows,
        pagination: PaginationInfo {
            page: pagination.page,
            page_size: pagination.page_size,
            total_count,
            total_pages: pagination.total_pages,
        },
    }))
}

/// GET /api/leads/:id
pub async fn get_lead(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Lead>> {
    leads::get_lead(&state.db, &id)
        .await
        .map_err(|e| ApiError::from_common("Failed to fetch lead", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))
}

/// Body for PATCH /api/leads/:id
#[derive(Debug, Deserialize)]
pub struct UpdateLeadRequest {
    pub status: Option<String>,
}

/// PATCH /api/leads/:id
pub async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<UpdateLeadRequest>, JsonRejection>,
) -> ApiResult<Json<Lead>> {
    let Json(request) = request?;
    let status: LeadStatus = request
        .status
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Missing required field: status".to_string()))?
        .parse()
        .map_err(|e| ApiError::from_common("Invalid status", e))?;

    let lead = leads::update_status(&state.db, &id, status)
        .await
        .map_err(|e| ApiError::from_common("Failed to update lead", e))?
        .ok_or_else(|| ApiError::NotFound("Lead not found".to_string()))?;

    info!("Lead {} moved to {}", lead.id, status);
    Ok(Json(lead))
}
