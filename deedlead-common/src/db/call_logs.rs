//! Call log queries
//!
//! Recording a call also updates the parent lead's contact metadata; both
//! writes share one transaction.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{CallLog, LeadSummary};
use crate::{Error, Result};

/// Input for a new call log
#[derive(Debug, Clone)]
pub struct NewCallLog {
    pub lead_id: String,
    pub user_id: String,
    pub outcome: String,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
}

/// Record a call and bump the lead's contact metadata
///
/// Returns [`Error::NotFound`] when the lead does not exist; nothing is written
/// in that case.
pub async fn create_call_log(pool: &SqlitePool, input: &NewCallLog) -> Result<CallLog> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        r#"
        UPDATE leads
        SET contact_attempts = COALESCE(contact_attempts, 0) + 1,
            last_contact_date = ?,
            last_contact_outcome = ?,
            next_follow_up = COALESCE(?, next_follow_up),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(now)
    .bind(&input.outcome)
    .bind(input.follow_up_date)
    .bind(now)
    .bind(&input.lead_id)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Err(Error::NotFound(format!("Lead {}", input.lead_id)));
    }

    sqlx::query(
        r#"
        INSERT INTO call_logs (id, lead_id, user_id, outcome, duration, notes, follow_up_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&input.lead_id)
    .bind(&input.user_id)
    .bind(&input.outcome)
    .bind(input.duration)
    .bind(&input.notes)
    .bind(input.follow_up_date)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(CallLog {
        id,
        lead_id: input.lead_id.clone(),
        user_id: input.user_id.clone(),
        outcome: input.outcome.clone(),
        duration: input.duration,
        notes: input.notes.clone(),
        follow_up_date: input.follow_up_date,
        created_at: now,
        lead: None,
    })
}

/// Most recent call logs, optionally restricted to one lead
pub async fn list_call_logs(pool: &SqlitePool, lead_id: Option<&str>, limit: i64) -> Result<Vec<CallLog>> {
    let mut builder = QueryBuilder::<Sqlite>::new(
        r#"
        SELECT c.id, c.lead_id, c.user_id, c.outcome, c.duration, c.notes,
               c.follow_up_date, c.created_at,
               l.owner_name AS lead_owner_name,
               l.property_address AS lead_property_address,
               l.parcel_id AS lead_parcel_id
        FROM call_logs c
        JOIN leads l ON l.id = c.lead_id
        "#,
    );

    if let Some(lead_id) = lead_id {
        builder.push(" WHERE c.lead_id = ").push_bind(lead_id.to_string());
    }

    builder.push(" ORDER BY c.created_at DESC, c.id ASC LIMIT ").push_bind(limit);

    let rows = builder.build().fetch_all(pool).await?;

    let mut logs = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut log = CallLog::from_row(row)?;
        log.lead = Some(LeadSummary {
            id: log.lead_id.clone(),
            owner_name: row.try_get("lead_owner_name")?,
            property_address: row.try_get("lead_property_address")?,
            parcel_id: row.try_get("lead_parcel_id")?,
        });
        logs.push(log);
    }

    Ok(logs)
}
