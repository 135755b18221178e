//! Canonical lead fields and the insertion-ready lead record
//!
//! Every importable column of the `leads` table has a [`LeadField`]. The
//! field's [`FieldKind`] decides which coercion the CSV row converter applies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::models::LeadStatus;

/// Number of `fieldN` overflow columns in the `leads` table
pub const MAX_OVERFLOW_FIELDS: usize = 10;

/// Storage type of a canonical field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Currency or other floating point value
    Decimal,
    /// Whole number (floored on import)
    Integer,
    /// Calendar date
    Date,
    /// Plain trimmed string
    Text,
}

/// Canonical lead field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LeadField {
    // Property identity
    ParcelId,
    PropertyAddress,
    PropertyCity,
    PropertyState,
    PropertyZip,
    County,

    // Owner
    OwnerName,
    OwnerAddress,
    OwnerCity,
    OwnerState,
    OwnerZip,
    OwnerPhone,
    OwnerEmail,

    // Tax and valuation
    TaxesOwed,
    AssessedValue,
    MarketValue,
    LandValue,
    ImprovementValue,
    MinimumBid,
    LastSalePrice,
    YearsDelinquent,
    TaxYear,
    CertificateNumber,
    CaseNumber,
    AuctionStatus,
    SaleDate,

    // Property characteristics
    PropertyType,
    Zoning,
    LegalDescription,
    Acres,
    SquareFeet,
    Bedrooms,
    Bathrooms,
    YearBuilt,
    Latitude,
    Longitude,

    // Workflow
    Status,
    Source,
    Priority,
    Notes,
    ContactAttempts,
}

impl LeadField {
    pub const ALL: [LeadField; 41] = [
        LeadField::ParcelId,
        LeadField::PropertyAddress,
        LeadField::PropertyCity,
        LeadField::PropertyState,
        LeadField::PropertyZip,
        LeadField::County,
        LeadField::OwnerName,
        LeadField::OwnerAddress,
        LeadField::OwnerCity,
        LeadField::OwnerState,
        LeadField::OwnerZip,
        LeadField::OwnerPhone,
        LeadField::OwnerEmail,
        LeadField::TaxesOwed,
        LeadField::AssessedValue,
        LeadField::MarketValue,
        LeadField::LandValue,
        LeadField::ImprovementValue,
        LeadField::MinimumBid,
        LeadField::LastSalePrice,
        LeadField::YearsDelinquent,
        LeadField::TaxYear,
        LeadField::CertificateNumber,
        LeadField::CaseNumber,
        LeadField::AuctionStatus,
        LeadField::SaleDate,
        LeadField::PropertyType,
        LeadField::Zoning,
        LeadField::LegalDescription,
        LeadField::Acres,
        LeadField::SquareFeet,
        LeadField::Bedrooms,
        LeadField::Bathrooms,
        LeadField::YearBuilt,
        LeadField::Latitude,
        LeadField::Longitude,
        LeadField::Status,
        LeadField::Source,
        LeadField::Priority,
        LeadField::Notes,
        LeadField::ContactAttempts,
    ];

    /// Column name in the `leads` table
    pub fn column(self) -> &'static str {
        match self {
            LeadField::ParcelId => "parcel_id",
            LeadField::PropertyAddress => "property_address",
            LeadField::PropertyCity => "property_city",
            LeadField::PropertyState => "property_state",
            LeadField::PropertyZip => "property_zip",
            LeadField::County => "county",
            LeadField::OwnerName => "owner_name",
            LeadField::OwnerAddress => "owner_address",
            LeadField::OwnerCity => "owner_city",
            LeadField::OwnerState => "owner_state",
            LeadField::OwnerZip => "owner_zip",
            LeadField::OwnerPhone => "owner_phone",
            LeadField::OwnerEmail => "owner_email",
            LeadField::TaxesOwed => "taxes_owed",
            LeadField::AssessedValue => "assessed_value",
            LeadField::MarketValue => "market_value",
            LeadField::LandValue => "land_value",
            LeadField::ImprovementValue => "improvement_value",
            LeadField::MinimumBid => "minimum_bid",
            LeadField::LastSalePrice => "last_sale_price",
            LeadField::YearsDelinquent => "years_delinquent",
            LeadField::TaxYear => "tax_year",
            LeadField::CertificateNumber => "certificate_number",
            LeadField::CaseNumber => "case_number",
            LeadField::AuctionStatus => "auction_status",
            LeadField::SaleDate => "sale_date",
            LeadField::PropertyType => "property_type",
            LeadField::Zoning => "zoning",
            LeadField::LegalDescription => "legal_description",
            LeadField::Acres => "acres",
            LeadField::SquareFeet => "square_feet",
            LeadField::Bedrooms => "bedrooms",
            LeadField::Bathrooms => "bathrooms",
            LeadField::YearBuilt => "year_built",
            LeadField::Latitude => "latitude",
            LeadField::Longitude => "longitude",
            LeadField::Status => "status",
            LeadField::Source => "source",
            LeadField::Priority => "priority",
            LeadField::Notes => "notes",
            LeadField::ContactAttempts => "contact_attempts",
        }
    }

    /// Canonical (API) name of the field
    pub fn name(self) -> &'static str {
        match self {
            LeadField::ParcelId => "parcelId",
            LeadField::PropertyAddress => "propertyAddress",
            LeadField::PropertyCity => "propertyCity",
            LeadField::PropertyState => "propertyState",
            LeadField::PropertyZip => "propertyZip",
            LeadField::County => "county",
            LeadField::OwnerName => "ownerName",
            LeadField::OwnerAddress => "ownerAddress",
            LeadField::OwnerCity => "ownerCity",
            LeadField::OwnerState => "ownerState",
            LeadField::OwnerZip => "ownerZip",
            LeadField::OwnerPhone => "ownerPhone",
            LeadField::OwnerEmail => "ownerEmail",
            LeadField::TaxesOwed => "taxesOwed",
            LeadField::AssessedValue => "assessedValue",
            LeadField::MarketValue => "marketValue",
            LeadField::LandValue => "landValue",
            LeadField::ImprovementValue => "improvementValue",
            LeadField::MinimumBid => "minimumBid",
            LeadField::LastSalePrice => "lastSalePrice",
            LeadField::YearsDelinquent => "yearsDelinquent",
            LeadField::TaxYear => "taxYear",
            LeadField::CertificateNumber => "certificateNumber",
            LeadField::CaseNumber => "caseNumber",
            LeadField::AuctionStatus => "auctionStatus",
            LeadField::SaleDate => "saleDate",
            LeadField::PropertyType => "propertyType",
            LeadField::Zoning => "zoning",
            LeadField::LegalDescription => "legalDescription",
            LeadField::Acres => "acres",
            LeadField::SquareFeet => "squareFeet",
            LeadField::Bedrooms => "bedrooms",
            LeadField::Bathrooms => "bathrooms",
            LeadField::YearBuilt => "yearBuilt",
            LeadField::Latitude => "latitude",
            LeadField::Longitude => "longitude",
            LeadField::Status => "status",
            LeadField::Source => "source",
            LeadField::Priority => "priority",
            LeadField::Notes => "notes",
            LeadField::ContactAttempts => "contactAttempts",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            LeadField::TaxesOwed
            | LeadField::AssessedValue
            | LeadField::MarketValue
            | LeadField::LandValue
            | LeadField::ImprovementValue
            | LeadField::MinimumBid
            | LeadField::LastSalePrice
            | LeadField::Acres
            | LeadField::SquareFeet
            | LeadField::Bathrooms
            | LeadField::Latitude
            | LeadField::Longitude => FieldKind::Decimal,

            LeadField::YearBuilt
            | LeadField::Bedrooms
            | LeadField::YearsDelinquent
            | LeadField::ContactAttempts => FieldKind::Integer,

            LeadField::SaleDate => FieldKind::Date,

            _ => FieldKind::Text,
        }
    }
}

/// A coerced value ready to be bound into an INSERT
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Decimal(f64),
    Integer(i64),
    Date(DateTime<Utc>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Lead record produced by the CSV row converter
///
/// Only non-null values are stored; an absent field is inserted as NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLead {
    pub status: LeadStatus,
    values: BTreeMap<LeadField, FieldValue>,
    overflow: BTreeMap<usize, String>,
}

impl Default for NewLead {
    fn default() -> Self {
        Self::new()
    }
}

impl NewLead {
    /// Empty lead stamped with the initial status
    pub fn new() -> Self {
        Self {
            status: LeadStatus::NewLead,
            values: BTreeMap::new(),
            overflow: BTreeMap::new(),
        }
    }

    pub fn set(&mut self, field: LeadField, value: FieldValue) {
        self.values.insert(field, value);
    }

    pub fn get(&self, field: LeadField) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    pub fn text(&self, field: LeadField) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn has(&self, field: LeadField) -> bool {
        self.values.contains_key(&field)
    }

    /// Store an overflow value; indexes beyond the table's capacity are ignored
    pub fn set_overflow(&mut self, index: usize, value: String) -> bool {
        if index == 0 || index > MAX_OVERFLOW_FIELDS {
            return false;
        }
        self.overflow.insert(index, value);
        true
    }

    pub fn overflow(&self, index: usize) -> Option<&str> {
        self.overflow.get(&index).map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = (LeadField, &FieldValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }

    pub fn overflow_values(&self) -> impl Iterator<Item = (usize, &str)> {
        self.overflow.iter().map(|(index, value)| (*index, value.as_str()))
    }
}
