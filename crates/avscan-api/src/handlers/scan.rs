//! Upload-and-scan handler.

use crate::error::HttpAppError;
use crate::state::AppState;
use avscan_core::constants::{STAGING_FILE_PREFIX, UPLOAD_FIELD_NAME, WEB_SCAN_TIMEOUT_SECS};
use avscan_core::{ScanError, ScanReport};
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

const INVALID_UPLOAD_MESSAGE: &str = "Please supply a valid file to scan.\n";

/// `POST /scan`: stage the `malware` field, scan it, answer with the report.
///
/// Scanner failures are reported inside the JSON record with status 200.
/// The staged file is removed when the handler returns, whatever the path.
pub async fn scan_upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => return Ok(invalid_upload(&rejection.body_text())),
    };

    let staged = match stage_upload(&state.staging_dir, multipart).await {
        Ok(staged) => staged,
        Err(ScanError::BadRequest(reason)) => return Ok(invalid_upload(&reason)),
        Err(e) => return Err(e.into()),
    };

    let record = state
        .orchestrator
        .scan_file(staged.path(), Duration::from_secs(WEB_SCAN_TIMEOUT_SECS))
        .await;

    Ok(Json(ScanReport::from(record)).into_response())
}

fn invalid_upload(reason: &str) -> Response {
    tracing::debug!(reason, "Rejected upload");
    (StatusCode::BAD_REQUEST, INVALID_UPLOAD_MESSAGE).into_response()
}

/// Write the first `malware` field into a fresh `web_*` file under `staging_dir`.
///
/// Multipart faults map to [`ScanError::BadRequest`]; filesystem faults to
/// [`ScanError::Io`].
async fn stage_upload(
    staging_dir: &Path,
    mut multipart: Multipart,
) -> Result<NamedTempFile, ScanError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ScanError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        tracing::debug!(
            filename = field.file_name().unwrap_or("unknown"),
            "Staging uploaded file"
        );
        return write_field(staging_dir, field).await;
    }

    Err(ScanError::BadRequest(format!(
        "missing `{}` field",
        UPLOAD_FIELD_NAME
    )))
}

async fn write_field(staging_dir: &Path, mut field: Field<'_>) -> Result<NamedTempFile, ScanError> {
    let staged = tempfile::Builder::new()
        .prefix(STAGING_FILE_PREFIX)
        .tempfile_in(staging_dir)?;

    let mut file = tokio::fs::File::from_std(staged.reopen()?);
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| ScanError::BadRequest(format!("Failed to read file data: {}", e)))?
    {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(staged)
}
