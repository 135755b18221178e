//! Per-field value coercion for CSV rows
//!
//! Coercion never fails: anything that cannot be read as the field's type
//! becomes null and the field is left out of the lead.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::headers::{ColumnMapping, ColumnTarget};
use crate::db::fields::{FieldKind, FieldValue, LeadField, NewLead};

/// Values treated as "no value" for text fields (compared case-insensitively)
const NULL_SENTINELS: [&str; 3] = ["", "null", "undefined"];

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
];

const DATE_FORMATS: [&str; 6] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Currency or decimal: `$` and `,` are stripped before parsing
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Decimal parse floored to a whole number
pub fn parse_integer(raw: &str) -> Option<i64> {
    parse_decimal(raw)
        .map(f64::floor)
        .filter(|n| *n >= i64::MIN as f64 && *n <= i64::MAX as f64)
        .map(|n| n as i64)
}

/// Lenient date parsing; date-only values are taken as midnight UTC
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc());
        }
    }

    if let Some(date) = parse_us_date(s) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// `MM/DD/YYYY`, or `MM/DD/YY` with a two-digit year
fn parse_us_date(s: &str) -> Option<NaiveDate> {
    let year_part = s.rsplit('/').next()?;
    if !s.contains('/') || !year_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let format = if year_part.len() <= 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
    NaiveDate::parse_from_str(s, format).ok()
}

/// Trimmed string, with the null sentinels mapped to `None`
pub fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if NULL_SENTINELS
        .iter()
        .any(|sentinel| trimmed.eq_ignore_ascii_case(sentinel))
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Coerce a raw value according to the field's kind
pub fn coerce(field: LeadField, raw: &str) -> Option<FieldValue> {
    match field.kind() {
        FieldKind::Decimal => parse_decimal(raw).map(FieldValue::Decimal),
        FieldKind::Integer => parse_integer(raw).map(FieldValue::Integer),
        FieldKind::Date => parse_date(raw).map(FieldValue::Date),
        FieldKind::Text => clean_text(raw).map(FieldValue::Text),
    }
}

/// Convert one data row into a lead using the column mapping
///
/// The lead always carries the initial status; a CSV status column is
/// ignored. Cells beyond the header row and overflow columns beyond the
/// table's capacity are dropped.
pub fn convert_row<S: AsRef<str>>(values: &[S], mapping: &ColumnMapping) -> NewLead {
    let mut lead = NewLead::new();

    for (position, target) in mapping.iter() {
        let Some(cell) = values.get(position) else {
            continue;
        };
        let raw: &str = cell.as_ref();
        if raw.trim().is_empty() {
            continue;
        }

        match target {
            ColumnTarget::Field(LeadField::Status) => {}
            ColumnTarget::Field(field) => {
                if let Some(value) = coerce(field, raw) {
                    lead.set(field, value);
                }
            }
            ColumnTarget::Overflow(index) => {
                if let Some(value) = clean_text(raw) {
                    lead.set_overflow(index, value);
                }
            }
        }
    }

    lead
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::LeadStatus;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_decimal_currency() {
        assert_eq!(parse_decimal("$12,345.67"), Some(12345.67));
        assert_eq!(parse_decimal(" 1,000 "), Some(1000.0));
        assert_eq!(parse_decimal("-3.5"), Some(-3.5));
    }

    #[test]
    fn test_parse_decimal_rejects_non_numeric() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("$"), None);
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal("NaN"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_parse_integer_floors() {
        assert_eq!(parse_integer("1998"), Some(1998));
        assert_eq!(parse_integer("3.9"), Some(3));
        assert_eq!(parse_integer("-1.5"), Some(-2));
        assert_eq!(parse_integer("abc"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let iso = parse_date("2024-03-15").unwrap();
        assert_eq!((iso.year(), iso.month(), iso.day()), (2024, 3, 15));

        let us = parse_date("03/15/2024").unwrap();
        assert_eq!(us, iso);

        let short = parse_date("3/15/24").unwrap();
        assert_eq!(short, iso);

        let long = parse_date("March 15, 2024").unwrap();
        assert_eq!(long, iso);

        let rfc = parse_date("2024-03-15T10:30:00Z").unwrap();
        assert_eq!(rfc.hour(), 10);

        let offset = parse_date("2024-03-15T10:30:00-05:00").unwrap();
        assert_eq!(offset.hour(), 15);
    }

    #[test]
    fn test_parse_date_minutes_and_twelve_hour_clock() {
        let minutes = parse_date("2024-03-15 14:05").unwrap();
        assert_eq!((minutes.day(), minutes.hour(), minutes.minute()), (15, 14, 5));

        let pm = parse_date("03/15/2024 2:05 PM").unwrap();
        assert_eq!(pm, minutes);

        let am = parse_date("3/15/2024 12:30:15 am").unwrap();
        assert_eq!((am.hour(), am.minute(), am.second()), (0, 30, 15));
    }

    #[test]
    fn test_parse_date_invalid_is_none() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("13/45/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_clean_text_sentinels() {
        assert_eq!(clean_text("  Jane Doe "), Some("Jane Doe".to_string()));
        assert_eq!(clean_text(""), None);
        assert_eq!(clean_text("null"), None);
        assert_eq!(clean_text("NULL"), None);
        assert_eq!(clean_text(" Undefined "), None);
        assert_eq!(clean_text("nullable"), Some("nullable".to_string()));
    }

    #[test]
    fn test_convert_row_dispatches_by_kind() {
        let mapping = ColumnMapping::from_headers(&[
            "Parcel ID",
            "Taxes Owed",
            "Year Built",
            "Sale Date",
            "Owner Name",
        ]);
        let lead = convert_row(&["A-100", "$12,345.67", "1987.6", "2023-07-01", "null"], &mapping);

        assert_eq!(lead.text(LeadField::ParcelId), Some("A-100"));
        assert_eq!(lead.get(LeadField::TaxesOwed), Some(&FieldValue::Decimal(12345.67)));
        assert_eq!(lead.get(LeadField::YearBuilt), Some(&FieldValue::Integer(1987)));
        assert!(matches!(lead.get(LeadField::SaleDate), Some(FieldValue::Date(_))));
        assert!(!lead.has(LeadField::OwnerName));
    }

    #[test]
    fn test_convert_row_invalid_values_become_null() {
        let mapping = ColumnMapping::from_headers(&["Parcel ID", "Market Value", "Sale Date"]);
        let lead = convert_row(&["A-1", "unknown", "someday"], &mapping);

        assert!(lead.has(LeadField::ParcelId));
        assert!(!lead.has(LeadField::MarketValue));
        assert!(!lead.has(LeadField::SaleDate));
    }

    #[test]
    fn test_convert_row_ignores_csv_status() {
        let mapping = ColumnMapping::from_headers(&["Owner", "Status"]);
        let lead = convert_row(&["Jane", "Closed Won"], &mapping);

        assert_eq!(lead.status, LeadStatus::NewLead);
        assert!(!lead.has(LeadField::Status));
    }

    #[test]
    fn test_convert_row_overflow_columns() {
        let mapping = ColumnMapping::from_headers(&["Owner", "Custom Note", "Flag"]);
        let lead = convert_row(&["Jane", "call after 5", "undefined"], &mapping);

        assert_eq!(lead.overflow(1), Some("call after 5"));
        assert_eq!(lead.overflow(2), None);
    }

    #[test]
    fn test_convert_row_short_and_long_rows() {
        let mapping = ColumnMapping::from_headers(&["Owner", "Address", "City"]);

        let short = convert_row(&["Jane"], &mapping);
        assert_eq!(short.text(LeadField::OwnerName), Some("Jane"));
        assert!(!short.has(LeadField::PropertyAddress));

        let long = convert_row(&["Jane", "1 Main St", "Springfield", "extra"], &mapping);
        assert_eq!(long.text(LeadField::PropertyCity), Some("Springfield"));
        assert_eq!(long.overflow_values().count(), 0);
    }
}
