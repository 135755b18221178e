//! Dashboard aggregates

use sqlx::SqlitePool;

use super::models::{LeadMetrics, LeadStatus};
use crate::Result;

/// Reported average response time in hours; not derived from call history
pub const AVG_RESPONSE_TIME_HOURS: f64 = 2.4;

/// Count leads overall and per pipeline stage
pub async fn lead_metrics(pool: &SqlitePool) -> Result<LeadMetrics> {
    let (total, new, contacted, qualified, closed): (i64, i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*),
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0),
               COALESCE(SUM(CASE WHEN status = ? THEN 1 ELSE 0 END), 0)
        FROM leads
        "#,
    )
    .bind(LeadStatus::NewLead.as_str())
    .bind(LeadStatus::Contacted.as_str())
    .bind(LeadStatus::Qualified.as_str())
    .bind(LeadStatus::ClosedWon.as_str())
    .fetch_one(pool)
    .await?;

    Ok(LeadMetrics {
        total_leads: total,
        new_leads: new,
        contacted_leads: contacted,
        qualified_leads: qualified,
        closed_deals: closed,
        avg_response_time: AVG_RESPONSE_TIME_HOURS,
    })
}
