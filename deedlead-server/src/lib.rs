//! deedlead-server library
//!
//! JSON API over the lead database: lead listing and status updates, call
//! logging, metrics and CSV import.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pagination;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Request body limit for CSV uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, max_upload_bytes: usize) -> Self {
        Self { db, max_upload_bytes }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let upload = Router::new()
        .route("/api/upload-csv", post(api::upload_csv))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .route("/api/leads", get(api::list_leads))
        .route("/api/leads/:id", get(api::get_lead).patch(api::update_lead))
        .route("/api/call-logs", get(api::list_call_logs).post(api::create_call_log))
        .route("/api/metrics", get(api::get_metrics))
        .route("/api/upload-sessions", get(api::list_upload_sessions))
        .route("/api/upload-sessions/:id", get(api::get_upload_session))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(upload)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
