//! HTTP error response conversion
//!
//! Handlers return `Result<Response, HttpAppError>`; any [`ScanError`] that
//! escapes a handler is rendered as an [`ErrorResponse`] JSON body with the
//! status code from [`ErrorMetadata`].

use avscan_core::{ErrorMetadata, LogLevel, ScanError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
}

/// Wrapper type for ScanError to implement IntoResponse
/// (orphan rules: both the trait and the error type are foreign here)
#[derive(Debug)]
pub struct HttpAppError(pub ScanError);

impl From<ScanError> for HttpAppError {
    fn from(err: ScanError) -> Self {
        HttpAppError(err)
    }
}

impl From<std::io::Error> for HttpAppError {
    fn from(err: std::io::Error) -> Self {
        HttpAppError(ScanError::Io(err))
    }
}

fn log_error(error: &ScanError) {
    let code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, code, "Request failed"),
        LogLevel::Warn => tracing::warn!(error = %error, code, "Request failed"),
        LogLevel::Error => tracing::error!(error = %error, code, "Request failed"),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;
        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(error);

        let body = ErrorResponse {
            error: error.client_message(),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
        };

        (status, Json(body)).into_response()
    }
}
