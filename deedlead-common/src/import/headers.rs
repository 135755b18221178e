//! Header normalization and column mapping
//!
//! A header cell is normalized (lowercase, non-alphanumeric runs become `_`,
//! repeated and edge underscores removed) and looked up in a synonym table.
//! Non-blank headers that match nothing become overflow columns `field1`,
//! `field2`, ... numbered in header order.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

use crate::db::fields::LeadField;

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));
static REPEATED_UNDERSCORE: Lazy<Regex> = Lazy::new(|| Regex::new(r"_+").expect("valid regex"));

/// Normalized header name → canonical field
const SYNONYMS: &[(&str, LeadField)] = &[
    ("parcel_id", LeadField::ParcelId),
    ("parcel_number", LeadField::ParcelId),
    ("parcel_no", LeadField::ParcelId),
    ("parcel", LeadField::ParcelId),
    ("apn", LeadField::ParcelId),
    ("pin", LeadField::ParcelId),
    ("folio", LeadField::ParcelId),
    ("account_number", LeadField::ParcelId),
    ("property_address", LeadField::PropertyAddress),
    ("address", LeadField::PropertyAddress),
    ("site_address", LeadField::PropertyAddress),
    ("situs_address", LeadField::PropertyAddress),
    ("street_address", LeadField::PropertyAddress),
    ("city", LeadField::PropertyCity),
    ("property_city", LeadField::PropertyCity),
    ("situs_city", LeadField::PropertyCity),
    ("state", LeadField::PropertyState),
    ("property_state", LeadField::PropertyState),
    ("zip", LeadField::PropertyZip),
    ("zip_code", LeadField::PropertyZip),
    ("zipcode", LeadField::PropertyZip),
    ("property_zip", LeadField::PropertyZip),
    ("postal_code", LeadField::PropertyZip),
    ("county", LeadField::County),
    ("owner_name", LeadField::OwnerName),
    ("owner", LeadField::OwnerName),
    ("owner_full_name", LeadField::OwnerName),
    ("taxpayer", LeadField::OwnerName),
    ("name", LeadField::OwnerName),
    ("owner_address", LeadField::OwnerAddress),
    ("mailing_address", LeadField::OwnerAddress),
    ("owner_mailing_address", LeadField::OwnerAddress),
    ("owner_city", LeadField::OwnerCity),
    ("mailing_city", LeadField::OwnerCity),
    ("owner_state", LeadField::OwnerState),
    ("mailing_state", LeadField::OwnerState),
    ("owner_zip", LeadField::OwnerZip),
    ("mailing_zip", LeadField::OwnerZip),
    ("phone", LeadField::OwnerPhone),
    ("phone_number", LeadField::OwnerPhone),
    ("owner_phone", LeadField::OwnerPhone),
    ("email", LeadField::OwnerEmail),
    ("owner_email", LeadField::OwnerEmail),
    ("taxes_owed", LeadField::TaxesOwed),
    ("amount_owed", LeadField::TaxesOwed),
    ("amount_due", LeadField::TaxesOwed),
    ("tax_due", LeadField::TaxesOwed),
    ("taxes_due", LeadField::TaxesOwed),
    ("total_due", LeadField::TaxesOwed),
    ("delinquent_amount", LeadField::TaxesOwed),
    ("assessed_value", LeadField::AssessedValue),
    ("assessment", LeadField::AssessedValue),
    ("market_value", LeadField::MarketValue),
    ("just_value", LeadField::MarketValue),
    ("estimated_value", LeadField::MarketValue),
    ("land_value", LeadField::LandValue),
    ("improvement_value", LeadField::ImprovementValue),
    ("building_value", LeadField::ImprovementValue),
    ("minimum_bid", LeadField::MinimumBid),
    ("min_bid", LeadField::MinimumBid),
    ("opening_bid", LeadField::MinimumBid),
    ("last_sale_price", LeadField::LastSalePrice),
    ("sale_price", LeadField::LastSalePrice),
    ("years_delinquent", LeadField::YearsDelinquent),
    ("tax_year", LeadField::TaxYear),
    ("certificate_number", LeadField::CertificateNumber),
    ("certificate", LeadField::CertificateNumber),
    ("cert_number", LeadField::CertificateNumber),
    ("case_number", LeadField::CaseNumber),
    ("auction_status", LeadField::AuctionStatus),
    ("sale_date", LeadField::SaleDate),
    ("auction_date", LeadField::SaleDate),
    ("property_type", LeadField::PropertyType),
    ("land_use", LeadField::PropertyType),
    ("use_code", LeadField::PropertyType),
    ("zoning", LeadField::Zoning),
    ("legal_description", LeadField::LegalDescription),
    ("legal", LeadField::LegalDescription),
    ("acres", LeadField::Acres),
    ("acreage", LeadField::Acres),
    ("lot_acres", LeadField::Acres),
    ("square_feet", LeadField::SquareFeet),
    ("sqft", LeadField::SquareFeet),
    ("sq_ft", LeadField::SquareFeet),
    ("living_area", LeadField::SquareFeet),
    ("bedrooms", LeadField::Bedrooms),
    ("beds", LeadField::Bedrooms),
    ("bathrooms", LeadField::Bathrooms),
    ("baths", LeadField::Bathrooms),
    ("year_built", LeadField::YearBuilt),
    ("latitude", LeadField::Latitude),
    ("lat", LeadField::Latitude),
    ("longitude", LeadField::Longitude),
    ("lng", LeadField::Longitude),
    ("lon", LeadField::Longitude),
    ("long", LeadField::Longitude),
    ("status", LeadField::Status),
    ("lead_status", LeadField::Status),
    ("source", LeadField::Source),
    ("lead_source", LeadField::Source),
    ("priority", LeadField::Priority),
    ("notes", LeadField::Notes),
    ("comments", LeadField::Notes),
    ("remarks", LeadField::Notes),
    ("contact_attempts", LeadField::ContactAttempts),
];

static SYNONYM_TABLE: Lazy<HashMap<&'static str, LeadField>> =
    Lazy::new(|| SYNONYMS.iter().copied().collect());

/// Normalize a raw header cell
///
/// `"Parcel Number"`, `"parcel_number"` and `"PARCEL-NUMBER"` all become
/// `parcel_number`.
pub fn normalize_header(raw: &str) -> String {
    let lower = raw.to_lowercase();
    let replaced = NON_ALPHANUMERIC.replace_all(&lower, "_");
    let collapsed = REPEATED_UNDERSCORE.replace_all(&replaced, "_");
    collapsed.trim_matches('_').to_string()
}

/// Canonical field for a normalized header, if any
pub fn lookup_field(normalized: &str) -> Option<LeadField> {
    SYNONYM_TABLE.get(normalized).copied()
}

/// Where a CSV column's values go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnTarget {
    Field(LeadField),
    /// 1-based overflow column number (`field1`, `field2`, ...)
    Overflow(usize),
}

impl fmt::Display for ColumnTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnTarget::Field(field) => f.write_str(field.name()),
            ColumnTarget::Overflow(index) => write!(f, "field{}", index),
        }
    }
}

/// Request-scoped `position → target` table derived from the header row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMapping {
    columns: Vec<(usize, ColumnTarget)>,
    overflow_count: usize,
}

impl ColumnMapping {
    /// Build the mapping for a header row; blank headers get no entry
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut columns = Vec::with_capacity(headers.len());
        let mut overflow_count = 0;

        for (position, raw) in headers.iter().enumerate() {
            let normalized = normalize_header(raw.as_ref());
            if let Some(field) = lookup_field(&normalized) {
                columns.push((position, ColumnTarget::Field(field)));
            } else if !raw.as_ref().trim().is_empty() {
                overflow_count += 1;
                columns.push((position, ColumnTarget::Overflow(overflow_count)));
            }
        }

        Self {
            columns,
            overflow_count,
        }
    }

    pub fn get(&self, position: usize) -> Option<ColumnTarget> {
        self.columns
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, target)| *target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, ColumnTarget)> + '_ {
        self.columns.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Number of unmapped, non-blank headers
    pub fn overflow_count(&self) -> usize {
        self.overflow_count
    }

    pub fn maps_field(&self, field: LeadField) -> bool {
        self.columns
            .iter()
            .any(|(_, target)| *target == ColumnTarget::Field(field))
    }
}
