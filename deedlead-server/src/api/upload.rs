//! CSV upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use deedlead_common::import::import_leads;
use serde::Serialize;
use tracing::{info, warn};

use crate::{ApiError, ApiResult, AppState};

/// Row errors echoed back in the upload response; the session keeps them all
pub const MAX_RESPONSE_ERRORS: usize = 10;

/// Multipart field carrying the CSV file
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub total_records: usize,
    pub success_records: usize,
    pub error_records: usize,
    pub errors: Vec<String>,
    pub upload_session_id: String,
}

/// An uploaded file pulled out of the multipart body
struct UploadedFile {
    filename: String,
    bytes: Vec<u8>,
}

async fn read_file_field(multipart: &mut Multipart) -> ApiResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        return Ok(Some(UploadedFile {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

fn is_csv_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".csv")
}

/// POST /api/upload-csv
pub async fn upload_csv(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let mut multipart = multipart?;
    let file = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    if !is_csv_filename(&file.filename) {
        warn!("Rejected upload {:?}: not a CSV file", file.filename);
        return Err(ApiError::BadRequest("File must be a CSV".to_string()));
    }

    let text = String::from_utf8(file.bytes)
        .map_err(|_| ApiError::BadRequest("CSV file must be UTF-8 encoded".to_string()))?;

    info!("Received {} ({} bytes)", file.filename, text.len());

    let summary = import_leads(&state.db, &file.filename, &text)
        .await
        .map_err(|e| ApiError::from_common("Failed to process CSV file", e))?;

    Ok(Json(UploadResponse {
        success: true,
        total_records: summary.total_records,
        success_records: summary.success_records,
        error_records: summary.error_records,
        errors: summary.errors.into_iter().take(MAX_RESPONSE_ERRORS).collect(),
        upload_session_id: summary.session_id,
    }))
}
