//! CSV lead import
//!
//! Pipeline, run sequentially for one uploaded file:
//! 1. [`tokenizer`] splits the text into lines and fields
//! 2. [`headers`] maps header cells to canonical fields
//! 3. [`convert`] coerces each row into a [`NewLead`]
//! 4. [`gate`] rejects rows without identity or with a stored parcel ID
//! 5. accepted rows are inserted one by one and the upload session is closed
//!
//! A failing row never aborts the import: it is counted and described in the
//! session's error list. There is no transaction around the whole file, so a
//! partially successful import is the normal outcome.

pub mod convert;
pub mod gate;
pub mod headers;
pub mod tokenizer;

use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use crate::db::fields::{LeadField, NewLead, MAX_OVERFLOW_FIELDS};
use crate::db::{leads, upload_sessions};
use crate::{Error, Result};

pub use convert::convert_row;
pub use gate::{ImportGate, RowRejection};
pub use headers::{normalize_header, ColumnMapping, ColumnTarget};
pub use tokenizer::{split_fields, split_lines};

/// One converted data row
#[derive(Debug, Clone)]
pub struct ParsedRow {
    /// 1-based line number in the uploaded file
    pub line: usize,
    pub lead: NewLead,
}

/// Header mapping plus converted rows of one file
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub mapping: ColumnMapping,
    pub rows: Vec<ParsedRow>,
}

impl ParsedCsv {
    /// Tokenize, map and convert a whole file
    ///
    /// Fails only when the file has no header row or no data rows.
    pub fn parse(text: &str) -> Result<Self> {
        let lines = split_lines(text);

        let Some((header, data)) = lines.split_first() else {
            return Err(Error::InvalidInput("CSV file is empty".to_string()));
        };
        if data.is_empty() {
            return Err(Error::InvalidInput(
                "CSV file must contain a header row and at least one data row".to_string(),
            ));
        }

        let mapping = ColumnMapping::from_headers(split_fields(header.text).as_slice());
        if mapping.overflow_count() > MAX_OVERFLOW_FIELDS {
            warn!(
                "{} unmapped columns; only the first {} are stored",
                mapping.overflow_count(),
                MAX_OVERFLOW_FIELDS
            );
        }

        let rows = data
            .iter()
            .map(|line| ParsedRow {
                line: line.number,
                lead: convert_row(split_fields(line.text).as_slice(), &mapping),
            })
            .collect();

        Ok(Self { mapping, rows })
    }

    /// Parcel IDs carried by the rows, in row order
    pub fn parcel_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter_map(|row| row.lead.text(LeadField::ParcelId))
            .map(str::to_string)
            .collect()
    }
}

/// Outcome of one import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    pub session_id: String,
    pub total_records: usize,
    pub success_records: usize,
    pub error_records: usize,
    /// Every row error, in row order
    pub errors: Vec<String>,
}

/// Import an uploaded CSV file
///
/// Creates the upload session before the row loop and completes it after.
/// Returns an error only for an unusable file or a failure outside the row
/// loop; row failures are reported in the summary.
pub async fn import_leads(pool: &SqlitePool, filename: &str, text: &str) -> Result<ImportSummary> {
    let parsed = ParsedCsv::parse(text)?;
    let session = upload_sessions::create_session(pool, filename).await?;

    info!(
        "Import {} started: {} rows, {} mapped columns from {}",
        session.id,
        parsed.rows.len(),
        parsed.mapping.len(),
        filename
    );

    let existing = leads::existing_parcel_ids(pool, &parsed.parcel_ids()).await?;
    let gate = ImportGate::new(existing);

    let mut success_records = 0usize;
    let mut errors = Vec::new();

    for row in &parsed.rows {
        if let Err(rejection) = gate.admit(&row.lead) {
            warn!("Row {} rejected: {}", row.line, rejection);
            errors.push(format!("Row {}: {}", row.line, rejection));
            continue;
        }

        match leads::insert_lead(pool, &row.lead).await {
            Ok(id) => {
                debug!("Row {} imported as lead {}", row.line, id);
                success_records += 1;
            }
            Err(e) => {
                error!("Row {} failed to insert: {}", row.line, e);
                errors.push(format!("Row {}: {}", row.line, RowRejection::Persist(e.to_string())));
            }
        }
    }

    let summary = ImportSummary {
        session_id: session.id,
        total_records: parsed.rows.len(),
        success_records,
        error_records: errors.len(),
        errors,
    };

    upload_sessions::complete_session(
        pool,
        &summary.session_id,
        &upload_sessions::SessionOutcome {
            total_records: summary.total_records as i64,
            success_records: summary.success_records as i64,
            error_records: summary.error_records as i64,
            errors: &summary.errors,
        },
    )
    .await?;

    info!(
        "Import {} completed: {} total, {} imported, {} errors",
        summary.session_id, summary.total_records, summary.success_records, summary.error_records
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_file() {
        assert!(matches!(ParsedCsv::parse(""), Err(Error::InvalidInput(_))));
        assert!(matches!(ParsedCsv::parse("\n\r\n  \n"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_parse_header_only() {
        assert!(matches!(
            ParsedCsv::parse("Parcel ID,Owner\n"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_parse_rows_keep_file_line_numbers() {
        let parsed = ParsedCsv::parse("Parcel ID,Owner\nP1,Jane\n\nP2,\"Doe, John\"\n").unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].line, 2);
        assert_eq!(parsed.rows[1].line, 4);
        assert_eq!(parsed.rows[1].lead.text(LeadField::OwnerName), Some("Doe, John"));
        assert_eq!(parsed.parcel_ids(), vec!["P1".to_string(), "P2".to_string()]);
    }
}
