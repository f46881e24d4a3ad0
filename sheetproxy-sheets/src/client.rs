//! Google Sheets values API client.

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use sheetproxy_core::constants::{DEFAULT_HTTP_TIMEOUT_SECONDS, DEFAULT_SHEETS_API_BASE_URL};
use sheetproxy_core::error::{Result, SheetError};
use sheetproxy_core::types::{FormatMapping, ValueRange};

use crate::address::{sheet_range, spreadsheet_id};
use crate::reshape::{labelled_object, rows_to_objects};

/// Sheets client configuration.
#[derive(Clone, Debug)]
pub struct SheetsConfig {
    /// Base URL of the Sheets API (overridable for tests and proxies)
    pub base_url: String,
    /// Google API key; requests fail with "Invalid API key" without one
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SHEETS_API_BASE_URL.into(),
            api_key: None,
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECONDS,
        }
    }
}

impl SheetsConfig {
    /// Creates config with an API key against the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Default::default()
        }
    }

    /// Overrides the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Client for reading sheet values.
pub struct SheetsClient {
    config: SheetsConfig,
    http_client: reqwest::Client,
}

impl SheetsClient {
    /// Creates a new client with the given config.
    pub fn with_config(config: SheetsConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| SheetError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SheetsConfig {
        &self.config
    }

    /// Fetches the raw values of a sheet.
    ///
    /// `sheet` selects a tab by name; `None` or empty reads the first tab.
    #[instrument(skip(self))]
    pub async fn get_sheet(&self, spreadsheet_url: &str, sheet: Option<&str>) -> Result<ValueRange> {
        let spreadsheet_id = spreadsheet_id(spreadsheet_url)?;
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(SheetError::MissingApiKey)?;

        let url = self.values_url(&spreadsheet_id, &sheet_range(sheet), api_key)?;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), spreadsheet_id = %spreadsheet_id, "Sheets API request failed");
            return Err(match status {
                StatusCode::BAD_REQUEST | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                    SheetError::SheetNotFound
                }
                _ => SheetError::UpstreamError {
                    status: status.as_u16(),
                    message: text,
                },
            });
        }

        let values: ValueRange = response.json().await.map_err(request_error)?;
        debug!(spreadsheet_id = %spreadsheet_id, rows = values.values.len(), "Fetched sheet values");
        Ok(values)
    }

    /// Fetches a sheet and returns its data rows as objects keyed by header.
    pub async fn array_data_from_sheet(
        &self,
        spreadsheet_url: &str,
        sheet: Option<&str>,
        format: &FormatMapping,
    ) -> Result<Value> {
        let values = self.get_sheet(spreadsheet_url, sheet).await?;
        Ok(Value::Array(rows_to_objects(&values, format)))
    }

    /// Fetches a sheet and collects its label/value rows into one object.
    pub async fn object_from_sheet(
        &self,
        spreadsheet_url: &str,
        sheet: Option<&str>,
        format: &FormatMapping,
    ) -> Result<Value> {
        let values = self.get_sheet(spreadsheet_url, sheet).await?;
        Ok(labelled_object(&values, format))
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str, api_key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| SheetError::ConfigError(format!("Invalid Sheets API base URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| SheetError::ConfigError("Sheets API base URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(["v4", "spreadsheets", spreadsheet_id, "values", range]);
        url.query_pairs_mut().append_pair("key", api_key);

        Ok(url)
    }
}

fn request_error(err: reqwest::Error) -> SheetError {
    if err.is_timeout() {
        SheetError::ConnectionTimeout(err.to_string())
    } else {
        SheetError::HttpError(err.to_string())
    }
}
