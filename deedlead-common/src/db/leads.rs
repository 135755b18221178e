//! Lead queries

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashSet;
use uuid::Uuid;

use super::fields::{FieldValue, NewLead};
use super::models::{Lead, LeadStatus};
use crate::Result;

/// SQLite's default bound-parameter limit is 999; stay well under it
const PARCEL_LOOKUP_CHUNK: usize = 500;

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    /// Exact status match
    pub status: Option<String>,
    /// Case-insensitive substring over owner, address, parcel, city and county
    pub search: Option<String>,
}

/// Listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadSort {
    #[default]
    Newest,
    Oldest,
    TaxesDesc,
    TaxesAsc,
    ValueDesc,
    ValueAsc,
    Owner,
}

impl LeadSort {
    /// Parse a `sort` query value; unknown values fall back to newest first
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            Some("oldest") => LeadSort::Oldest,
            Some("taxes_desc") => LeadSort::TaxesDesc,
            Some("taxes_asc") => LeadSort::TaxesAsc,
            Some("value_desc") => LeadSort::ValueDesc,
            Some("value_asc") => LeadSort::ValueAsc,
            Some("owner") => LeadSort::Owner,
            _ => LeadSort::Newest,
        }
    }

    fn order_by(self) -> &'static str {
        // NULLs sort last for the numeric orders; id breaks ties for stable paging
        match self {
            LeadSort::Newest => " ORDER BY created_at DESC, id ASC",
            LeadSort::Oldest => " ORDER BY created_at ASC, id ASC",
            LeadSort::TaxesDesc => " ORDER BY taxes_owed IS NULL, taxes_owed DESC, id ASC",
            LeadSort::TaxesAsc => " ORDER BY taxes_owed IS NULL, taxes_owed ASC, id ASC",
            LeadSort::ValueDesc => " ORDER BY market_value IS NULL, market_value DESC, id ASC",
            LeadSort::ValueAsc => " ORDER BY market_value IS NULL, market_value ASC, id ASC",
            LeadSort::Owner => " ORDER BY owner_name IS NULL, owner_name COLLATE NOCASE ASC, id ASC",
        }
    }
}

/// Escape LIKE wildcards so user input matches literally
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &LeadFilter) {
    builder.push(" WHERE 1 = 1");

    if let Some(status) = filter.status.as_deref().filter(|s| !s.trim().is_empty()) {
        builder.push(" AND status = ").push_bind(status.trim().to_string());
    }

    if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let pattern = like_pattern(search.trim());
        builder.push(" AND (");
        for (i, column) in ["owner_name", "property_address", "parcel_id", "property_city", "county"]
            .iter()
            .enumerate()
        {
            if i > 0 {
                builder.push(" OR ");
            }
            builder
                .push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
        builder.push(")");
    }
}

/// Count leads matching the filter
pub async fn count_leads(pool: &SqlitePool, filter: &LeadFilter) -> Result<i64> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM leads");
    push_filter(&mut builder, filter);

    let count: i64 = builder.build_query_scalar().fetch_one(pool).await?;
    Ok(count)
}

/// Fetch one page of leads matching the filter
pub async fn list_leads(
    pool: &SqlitePool,
    filter: &LeadFilter,
    sort: LeadSort,
    limit: i64,
    offset: i64,
) -> Result<Vec<Lead>> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT * FROM leads");
    push_filter(&mut builder, filter);
    builder.push(sort.order_by());
    builder.push(" LIMIT ").push_bind(limit);
    builder.push(" OFFSET ").push_bind(offset);

    let rows = builder.build().fetch_all(pool).await?;
    let leads = rows.iter().map(Lead::from_row).collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(leads)
}

pub async fn get_lead(pool: &SqlitePool, id: &str) -> Result<Option<Lead>> {
    let row = sqlx::query("SELECT * FROM leads WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(Lead::from_row).transpose()?)
}

/// Insert a converted lead, returning its new id
pub async fn insert_lead(pool: &SqlitePool, lead: &NewLead) -> Result<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO leads (id, status, created_at, updated_at");
    for (field, _) in lead.values() {
        builder.push(", ").push(field.column());
    }
    for (index, _) in lead.overflow_values() {
        builder.push(format!(", field{}", index));
    }

    builder.push(") VALUES (");
    let mut values = builder.separated(", ");
    values.push_bind(id.clone());
    values.push_bind(lead.status.as_str());
    values.push_bind(now);
    values.push_bind(now);
    for (_, value) in lead.values() {
        match value {
            FieldValue::Text(s) => values.push_bind(s.clone()),
            FieldValue::Decimal(n) => values.push_bind(*n),
            FieldValue::Integer(n) => values.push_bind(*n),
            FieldValue::Date(d) => values.push_bind(*d),
        };
    }
    for (_, value) in lead.overflow_values() {
        values.push_bind(value.to_string());
    }
    values.push_unseparated(")");

    builder.build().execute(pool).await?;

    Ok(id)
}

/// Which of `parcel_ids` already belong to a stored lead
pub async fn existing_parcel_ids(pool: &SqlitePool, parcel_ids: &[String]) -> Result<HashSet<String>> {
    let mut existing = HashSet::new();

    for chunk in parcel_ids.chunks(PARCEL_LOOKUP_CHUNK) {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT parcel_id FROM leads WHERE parcel_id IN (");
        let mut ids = builder.separated(", ");
        for parcel_id in chunk {
            ids.push_bind(parcel_id.clone());
        }
        ids.push_unseparated(")");

        let found: Vec<String> = builder.build_query_scalar().fetch_all(pool).await?;
        existing.extend(found);
    }

    Ok(existing)
}

/// Set a lead's status, returning the updated lead if it exists
pub async fn update_status(pool: &SqlitePool, id: &str, status: LeadStatus) -> Result<Option<Lead>> {
    let result = sqlx::query("UPDATE leads SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_lead(pool, id).await
}
