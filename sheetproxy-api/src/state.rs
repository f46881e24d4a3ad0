//! App state: config, sheets client, proxy cache and its sweeper.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use sheetproxy_cache::{CacheConfig, ExpiryScheduler, ProxyCache};
use sheetproxy_core::constants::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_PORT, DEFAULT_SHEETS_API_BASE_URL};
use sheetproxy_core::error::Result;
use sheetproxy_sheets::{SheetsClient, SheetsConfig};

/// Server configuration, normally read from the environment.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// `GOOGLE_API_KEY`
    pub google_api_key: Option<String>,
    /// `SHEETS_API_BASE_URL`
    pub sheets_api_base_url: String,
    /// `APP_ENV=production` disables permissive CORS
    pub production: bool,
    /// `ENABLE_CACHE`; when false every request reaches the Sheets API
    pub enable_cache: bool,
    /// `CACHE_TTL_SECONDS`
    pub cache_ttl_seconds: u64,
    /// `PORT`
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            sheets_api_base_url: DEFAULT_SHEETS_API_BASE_URL.into(),
            production: false,
            enable_cache: true,
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            port: DEFAULT_PORT,
        }
    }
}

impl ApiConfig {
    /// Reads the config from the process environment.
    ///
    /// Outside production a `.env` file is loaded first, if present.
    pub fn from_env() -> Self {
        if !is_production(std::env::var("APP_ENV").ok().as_deref()) {
            let _ = dotenvy::dotenv();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            google_api_key: var("GOOGLE_API_KEY").filter(|k| !k.is_empty()),
            sheets_api_base_url: var("SHEETS_API_BASE_URL")
                .unwrap_or(defaults.sheets_api_base_url),
            production: is_production(var("APP_ENV").as_deref()),
            enable_cache: var("ENABLE_CACHE")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            cache_ttl_seconds: var("CACHE_TTL_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&ttl| ttl > 0)
                .unwrap_or(defaults.cache_ttl_seconds),
            port: var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    fn sheets_config(&self) -> SheetsConfig {
        SheetsConfig {
            api_key: self.google_api_key.clone(),
            ..SheetsConfig::default().with_base_url(&self.sheets_api_base_url)
        }
    }
}

fn is_production(app_env: Option<&str>) -> bool {
    app_env.is_some_and(|v| v.eq_ignore_ascii_case("production"))
}

/// State shared by all handlers.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Sheets API client
    pub sheets: SheetsClient,
    /// Memoized sheet responses
    pub cache: Arc<ProxyCache<Value>>,
    /// Sweeper for `cache`; started by [`ApiServer::run`](crate::ApiServer::run)
    pub scheduler: ExpiryScheduler<Value>,
    /// Server start time
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Builds the client, cache and a stopped scheduler.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let sheets = SheetsClient::with_config(config.sheets_config())?;
        let cache = Arc::new(ProxyCache::with_config(CacheConfig::with_ttl_seconds(
            config.cache_ttl_seconds,
        )));
        let scheduler = ExpiryScheduler::new(Arc::clone(&cache));

        Ok(Self {
            config,
            sheets,
            cache,
            scheduler,
            started_at: Utc::now(),
        })
    }
}
