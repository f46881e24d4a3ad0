//! Error types for sheetproxy.
//!
//! A single error hierarchy built with `thiserror`, shared by the sheets
//! client and the HTTP layer.

use thiserror::Error;

/// Result type alias using `SheetError`.
pub type Result<T> = std::result::Result<T, SheetError>;

/// Main error type for all sheetproxy operations.
#[derive(Debug, Error)]
pub enum SheetError {
    // ═══════════════════════════════════════════════════════════════════════════
    // INPUT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The spreadsheet URL is not a Google Sheets URL or carries no id.
    #[error("{0}")]
    InvalidSpreadsheetUrl(String),

    /// The format mapping is not an array of single-pair objects.
    #[error("Invalid format mapping: {0}")]
    InvalidFormat(String),

    /// A required request parameter is absent.
    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // UPSTREAM ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The spreadsheet or the named sheet does not exist (or is not shared).
    #[error("Invalid spreadsheet URL, or sheet name")]
    SheetNotFound,

    /// The upstream API answered with an unexpected status.
    #[error("Sheets API returned HTTP {status}: {message}")]
    UpstreamError { status: u16, message: String },

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Connection timeout.
    #[error("Connection timeout: {0}")]
    ConnectionTimeout(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION
    // ═══════════════════════════════════════════════════════════════════════════

    /// No Google API key is configured.
    #[error("Invalid API key")]
    MissingApiKey,

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
