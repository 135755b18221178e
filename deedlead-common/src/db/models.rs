//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[serde(rename = "New Lead")]
    NewLead,
    Contacted,
    Qualified,
    Negotiating,
    #[serde(rename = "Under Contract")]
    UnderContract,
    #[serde(rename = "Closed Won")]
    ClosedWon,
    #[serde(rename = "Closed Lost")]
    ClosedLost,
    Dead,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 8] = [
        LeadStatus::NewLead,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Negotiating,
        LeadStatus::UnderContract,
        LeadStatus::ClosedWon,
        LeadStatus::ClosedLost,
        LeadStatus::Dead,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::NewLead => "New Lead",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Negotiating => "Negotiating",
            LeadStatus::UnderContract => "Under Contract",
            LeadStatus::ClosedWon => "Closed Won",
            LeadStatus::ClosedLost => "Closed Lost",
            LeadStatus::Dead => "Dead",
        }
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .iter()
            .copied()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown lead status: {}", s)))
    }
}

/// A stored lead
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub status: String,

    pub parcel_id: Option<String>,
    pub property_address: Option<String>,
    pub property_city: Option<String>,
    pub property_state: Option<String>,
    pub property_zip: Option<String>,
    pub county: Option<String>,

    pub owner_name: Option<String>,
    pub owner_address: Option<String>,
    pub owner_city: Option<String>,
    pub owner_state: Option<String>,
    pub owner_zip: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_email: Option<String>,

    pub taxes_owed: Option<f64>,
    pub assessed_value: Option<f64>,
    pub market_value: Option<f64>,
    pub land_value: Option<f64>,
    pub improvement_value: Option<f64>,
    pub minimum_bid: Option<f64>,
    pub last_sale_price: Option<f64>,
    pub years_delinquent: Option<i64>,
    pub tax_year: Option<String>,
    pub certificate_number: Option<String>,
    pub case_number: Option<String>,
    pub auction_status: Option<String>,
    pub sale_date: Option<DateTime<Utc>>,

    pub property_type: Option<String>,
    pub zoning: Option<String>,
    pub legal_description: Option<String>,
    pub acres: Option<f64>,
    pub square_feet: Option<f64>,
    pub bedrooms: Option<i64>,
    pub bathrooms: Option<f64>,
    pub year_built: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub source: Option<String>,
    pub priority: Option<String>,
    pub notes: Option<String>,

    pub contact_attempts: Option<i64>,
    pub last_contact_date: Option<DateTime<Utc>>,
    pub last_contact_outcome: Option<String>,
    pub next_follow_up: Option<DateTime<Utc>>,

    pub field1: Option<String>,
    pub field2: Option<String>,
    pub field3: Option<String>,
    pub field4: Option<String>,
    pub field5: Option<String>,
    pub field6: Option<String>,
    pub field7: Option<String>,
    pub field8: Option<String>,
    pub field9: Option<String>,
    pub field10: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lead {
    pub fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            status: row.try_get("status")?,
            parcel_id: row.try_get("parcel_id")?,
            property_address: row.try_get("property_address")?,
            property_city: row.try_get("property_city")?,
            property_state: row.try_get("property_state")?,
            property_zip: row.try_get("property_zip")?,
            county: row.try_get("county")?,
            owner_name: row.try_get("owner_name")?,
            owner_address: row.try_get("owner_address")?,
            owner_city: row.try_get("owner_city")?,
            owner_state: row.try_get("owner_state")?,
            owner_zip: row.try_get("owner_zip")?,
            owner_phone: row.try_get("owner_phone")?,
            owner_email: row.try_get("owner_email")?,
            taxes_owed: row.try_get("taxes_owed")?,
            assessed_value: row.try_get("assessed_value")?,
            market_value: row.try_get("market_value")?,
            land_value: row.try_get("land_value")?,
            improvement_value: row.try_get("improvement_value")?,
            minimum_bid: row.try_get("minimum_bid")?,
            last_sale_price: row.try_get("last_sale_price")?,
            years_delinquent: row.try_get("years_delinquent")?,
            tax_year: row.try_get("tax_year")?,
            certificate_number: row.try_get("certificate_number")?,
            case_number: row.try_get("case_number")?,
            auction_status: row.try_get("auction_status")?,
            sale_date: row.try_get("sale_date")?,
            property_type: row.try_get("property_type")?,
            zoning: row.try_get("zoning")?,
            legal_description: row.try_get("legal_description")?,
            acres: row.try_get("acres")?,
            square_feet: row.try_get("square_feet")?,
            bedrooms: row.try_get("bedrooms")?,
            bathrooms: row.try_get("bathrooms")?,
            year_built: row.try_get("year_built")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            source: row.try_get("source")?,
            priority: row.try_get("priority")?,
            notes: row.try_get("notes")?,
            contact_attempts: row.try_get("contact_attempts")?,
            last_contact_date: row.try_get("last_contact_date")?,
            last_contact_outcome: row.try_get("last_contact_outcome")?,
            next_follow_up: row.try_get("next_follow_up")?,
            field1: row.try_get("field1")?,
            field2: row.try_get("field2")?,
            field3: row.try_get("field3")?,
            field4: row.try_get("field4")?,
            field5: row.try_get("field5")?,
            field6: row.try_get("field6")?,
            field7: row.try_get("field7")?,
            field8: row.try_get("field8")?,
            field9: row.try_get("field9")?,
            field10: row.try_get("field10")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Minimal lead identity embedded in call log listings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSummary {
    pub id: String,
    pub owner_name: Option<String>,
    pub property_address: Option<String>,
    pub parcel_id: Option<String>,
}

/// A recorded call against a lead
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    pub id: String,
    pub lead_id: String,
    pub user_id: String,
    pub outcome: String,
    /// Call length in seconds
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead: Option<LeadSummary>,
}

impl CallLog {
    pub fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            lead_id: row.try_get("lead_id")?,
            user_id: row.try_get("user_id")?,
            outcome: row.try_get("outcome")?,
            duration: row.try_get("duration")?,
            notes: row.try_get("notes")?,
            follow_up_date: row.try_get("follow_up_date")?,
            created_at: row.try_get("created_at")?,
            lead: None,
        })
    }
}

/// Upload session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Processing,
    Completed,
}

impl UploadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadStatus::Processing => "Processing",
            UploadStatus::Completed => "Completed",
        }
    }
}

impl FromStr for UploadStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Processing" => Ok(UploadStatus::Processing),
            "Completed" => Ok(UploadStatus::Completed),
            other => Err(Error::Internal(format!("Unknown upload status: {}", other))),
        }
    }
}

/// Summary record of one CSV import
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSession {
    pub id: String,
    pub filename: String,
    pub total_records: i64,
    pub success_records: i64,
    pub error_records: i64,
    pub status: UploadStatus,
    pub errors: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Dashboard counters
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadMetrics {
    pub total_leads: i64,
    pub new_leads: i64,
    pub contacted_leads: i64,
    pub qualified_leads: i64,
    pub closed_deals: i64,
    /// Hours; a fixed figure, not computed from call history
    pub avg_response_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_str() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("new lead".parse::<LeadStatus>().unwrap(), LeadStatus::NewLead);
        assert_eq!(" CONTACTED ".parse::<LeadStatus>().unwrap(), LeadStatus::Contacted);
        assert!("Archived".parse::<LeadStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_as_display_name() {
        let json = serde_json::to_string(&LeadStatus::UnderContract).unwrap();
        assert_eq!(json, "\"Under Contract\"");
    }
}
