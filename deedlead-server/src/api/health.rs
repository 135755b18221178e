//! Health check endpoint
//!
//! Always answers 200 while the process is up; `database` reports whether the
//! lead database answered a trivial query.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    /// "ok" or "unavailable"
    pub database: &'static str,
}

async fn database_reachable(db: &SqlitePool) -> bool {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(db).await {
        Ok(_) => true,
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            false
        }
    }
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if database_reachable(&state.db).await {
        "ok"
    } else {
        "unavailable"
    };

    Json(HealthResponse {
        status: "ok",
        module: "deedlead-server",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
