//! Database initialization
//!
//! Opens (or creates) the SQLite database and brings the schema up to date.
//! Every statement is idempotent, so running it against an existing database
//! is safe.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Open the database at `db_path`, creating the file and schema if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory database with the full schema
///
/// Used by tests and by throwaway tooling; one connection keeps every query
/// on the same in-memory database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_leads_table(pool).await?;
    create_call_logs_table(pool).await?;
    create_upload_sessions_table(pool).await?;
    Ok(())
}

async fn create_leads_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS leads (
            id TEXT PRIMARY KEY,
            status TEXT NOT NULL DEFAULT 'New Lead',

            parcel_id TEXT,
            property_address TEXT,
            property_city TEXT,
            property_state TEXT,
            property_zip TEXT,
            county TEXT,

            owner_name TEXT,
            owner_address TEXT,
            owner_city TEXT,
            owner_state TEXT,
            owner_zip TEXT,
            owner_phone TEXT,
            owner_email TEXT,

            taxes_owed REAL,
            assessed_value REAL,
            market_value REAL,
            land_value REAL,
            improvement_value REAL,
            minimum_bid REAL,
            last_sale_price REAL,
            years_delinquent INTEGER,
            tax_year TEXT,
            certificate_number TEXT,
            case_number TEXT,
            auction_status TEXT,
            sale_date TEXT,

            property_type TEXT,
            zoning TEXT,
            legal_description TEXT,
            acres REAL,
            square_feet REAL,
            bedrooms INTEGER,
            bathrooms REAL,
            year_built INTEGER,
            latitude REAL,
            longitude REAL,

            source TEXT,
            priority TEXT,
            notes TEXT,

            contact_attempts INTEGER,
            last_contact_date TEXT,
            last_contact_outcome TEXT,
            next_follow_up TEXT,

            field1 TEXT,
            field2 TEXT,
            field3 TEXT,
            field4 TEXT,
            field5 TEXT,
            field6 TEXT,
            field7 TEXT,
            field8 TEXT,
            field9 TEXT,
            field10 TEXT,

            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // parcel_id uniqueness is enforced by the import gate, not by the schema
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_parcel_id ON leads(parcel_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_status ON leads(status)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_leads_created_at ON leads(created_at)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_call_logs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS call_logs (
            id TEXT PRIMARY KEY,
            lead_id TEXT NOT NULL REFERENCES leads(id) ON DELETE CASCADE,
            user_id TEXT NOT NULL,
            outcome TEXT NOT NULL,
            duration INTEGER,
            notes TEXT,
            follow_up_date TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_call_logs_lead_id ON call_logs(lead_id)")
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_upload_sessions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS upload_sessions (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            total_records INTEGER NOT NULL DEFAULT 0,
            success_records INTEGER NOT NULL DEFAULT 0,
            error_records INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL,
            errors TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL,
            completed_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
