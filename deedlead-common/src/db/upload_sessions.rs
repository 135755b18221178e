//! Upload session persistence
//!
//! A session row is written once when an import starts and once when it
//! finishes. The error list is stored as a JSON array.

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::models::{UploadSession, UploadStatus};
use crate::{Error, Result};

/// Create a session in the Processing state with zero counters
pub async fn create_session(pool: &SqlitePool, filename: &str) -> Result<UploadSession> {
    let session = UploadSession {
        id: Uuid::new_v4().to_string(),
        filename: filename.to_string(),
        total_records: 0,
        success_records: 0,
        error_records: 0,
        status: UploadStatus::Processing,
        errors: Vec::new(),
        created_at: Utc::now(),
        completed_at: None,
    };

    sqlx::query(
        r#"
        INSERT INTO upload_sessions (id, filename, total_records, success_records, error_records, status, errors, created_at)
        VALUES (?, ?, 0, 0, 0, ?, '[]', ?)
        "#,
    )
    .bind(&session.id)
    .bind(&session.filename)
    .bind(session.status.as_str())
    .bind(session.created_at)
    .execute(pool)
    .await?;

    Ok(session)
}

/// Final counts of an import
#[derive(Debug, Clone)]
pub struct SessionOutcome<'a> {
    pub total_records: i64,
    pub success_records: i64,
    pub error_records: i64,
    pub errors: &'a [String],
}

/// Record the final counts and mark the session Completed
pub async fn complete_session(pool: &SqlitePool, id: &str, outcome: &SessionOutcome<'_>) -> Result<()> {
    let errors = serde_json::to_string(outcome.errors)?;

    let result = sqlx::query(
        r#"
        UPDATE upload_sessions
        SET total_records = ?, success_records = ?, error_records = ?,
            status = ?, errors = ?, completed_at = ?
        WHERE id = ?
        "#,
    )
    .bind(outcome.total_records)
    .bind(outcome.success_records)
    .bind(outcome.error_records)
    .bind(UploadStatus::Completed.as_str())
    .bind(errors)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Upload session {}", id)));
    }

    Ok(())
}

pub async fn get_session(pool: &SqlitePool, id: &str) -> Result<Option<UploadSession>> {
    let row = sqlx::query("SELECT * FROM upload_sessions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(session_from_row).transpose()
}

/// Most recent sessions first
pub async fn list_sessions(pool: &SqlitePool, limit: i64) -> Result<Vec<UploadSession>> {
    let rows = sqlx::query("SELECT * FROM upload_sessions ORDER BY created_at DESC, id ASC LIMIT ?")
        .bind(limit)
        .fetch_all(pool)
        .await?;

    rows.iter().map(session_from_row).collect()
}

fn session_from_row(row: &SqliteRow) -> Result<UploadSession> {
    let status: String = row.try_get("status")?;
    let errors: String = row.try_get("errors")?;

    Ok(UploadSession {
        id: row.try_get("id")?,
        filename: row.try_get("filename")?,
        total_records: row.try_get("total_records")?,
        success_records: row.try_get("success_records")?,
        error_records: row.try_get("error_records")?,
        status: status.parse()?,
        errors: serde_json::from_str(&errors)?,
        created_at: row.try_get("created_at")?,
        completed_at: row.try_get("completed_at")?,
    })
}
