//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sheetproxy_core::error::SheetError;

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    /// Upstream (Google Sheets) failure.
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message, "UPSTREAM_ERROR")
    }

    /// HTTP status of the error.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        match &err {
            SheetError::InvalidSpreadsheetUrl(_)
            | SheetError::InvalidFormat(_)
            | SheetError::MissingParameter(_) => ApiError::bad_request(err.to_string()),
            SheetError::SheetNotFound => ApiError::not_found(err.to_string()),
            SheetError::MissingApiKey | SheetError::ConfigError(_) => {
                tracing::error!(error = %err, "Server misconfigured");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), "CONFIG_ERROR")
            }
            SheetError::UpstreamError { .. }
            | SheetError::HttpError(_)
            | SheetError::ConnectionTimeout(_) => {
                tracing::warn!(error = %err, "Upstream failure");
                ApiError::bad_gateway(err.to_string())
            }
        }
    }
}
