//! DTOs for API requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sheetproxy_core::error::{Result, SheetError};
use sheetproxy_core::types::FormatMapping;

/// Query string of the sheet routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetQuery {
    /// Google Sheets URL (`https://docs.google.com/spreadsheets/d/<id>/...`)
    pub spreadsheet_url: Option<String>,
    /// Tab name; empty or absent reads the first tab
    pub sheet: Option<String>,
    /// JSON array of `{ "outputKey": "sheet label" }` objects
    pub format: Option<String>,
}

/// Validated arguments of a sheet fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct SheetRequest {
    pub spreadsheet_url: String,
    pub sheet: Option<String>,
    pub format: FormatMapping,
}

impl SheetRequest {
    /// Ordered argument list used as the cache key.
    pub fn into_args(self) -> (String, Option<String>, FormatMapping) {
        (self.spreadsheet_url, self.sheet, self.format)
    }
}

impl TryFrom<SheetQuery> for SheetRequest {
    type Error = SheetError;

    fn try_from(query: SheetQuery) -> Result<Self> {
        let spreadsheet_url = query
            .spreadsheet_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SheetError::MissingParameter("spreadsheetUrl".into()))?;

        let sheet = query.sheet.filter(|s| !s.trim().is_empty());

        let format = match query.format.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => FormatMapping::from_json_str(raw)?,
            _ => FormatMapping::new(),
        };

        Ok(Self {
            spreadsheet_url,
            sheet,
            format,
        })
    }
}

/// Response of `GET /`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response of `GET /health`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always "ok"
    pub status: String,
    /// Crate version
    pub version: String,
    /// When the server state was created
    pub started_at: DateTime<Utc>,
    /// Seconds since `started_at`
    pub uptime_seconds: i64,
    /// Whether sheet routes go through the proxy cache
    pub cache_enabled: bool,
    /// Cached results, including expired ones not yet swept
    pub cached_entries: usize,
    /// Whether the expiry sweep is running
    pub scheduler_running: bool,
}
