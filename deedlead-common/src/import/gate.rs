//! Validation and duplicate gate for converted rows

use std::collections::HashSet;
use thiserror::Error;

use crate::db::fields::{LeadField, NewLead};

/// Why a row was not imported
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejection {
    #[error("Missing required fields (parcel ID, property address, or owner name)")]
    MissingIdentity,

    #[error("Duplicate parcel ID {0}")]
    DuplicateParcel(String),

    #[error("Failed to save lead: {0}")]
    Persist(String),
}

/// A lead must carry at least one of parcel ID, property address, owner name
pub fn has_identity(lead: &NewLead) -> bool {
    [LeadField::ParcelId, LeadField::PropertyAddress, LeadField::OwnerName]
        .iter()
        .any(|field| lead.has(*field))
}

/// Admits rows that identify a property and do not repeat a stored parcel ID
///
/// The set of stored parcel IDs is taken once before the import loop, so two
/// rows of the same file sharing a new parcel ID are both admitted.
#[derive(Debug, Clone, Default)]
pub struct ImportGate {
    existing_parcels: HashSet<String>,
}

impl ImportGate {
    pub fn new(existing_parcels: HashSet<String>) -> Self {
        Self { existing_parcels }
    }

    pub fn admit(&self, lead: &NewLead) -> Result<(), RowRejection> {
        if !has_identity(lead) {
            return Err(RowRejection::MissingIdentity);
        }

        if let Some(parcel_id) = lead.text(LeadField::ParcelId) {
            if self.existing_parcels.contains(parcel_id) {
                return Err(RowRejection::DuplicateParcel(parcel_id.to_string()));
            }
        }

        Ok(())
    }
}
