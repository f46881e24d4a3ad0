//! # sheetproxy API Server
//!
//! HTTP façade that reads Google Sheets and returns reshaped JSON, with
//! results memoized in a short-lived proxy cache.
//!
//! ## Endpoints
//!
//! - `GET /` - Hello world
//! - `GET /health` - Server and cache status
//! - `GET /api/array-data-from-sheet` - Data rows as objects keyed by header
//! - `GET /api/object-from-sheet` - Label/value rows as one object
//!
//! Both sheet routes take `spreadsheetUrl`, `sheet` and `format` (a JSON
//! array of `{ "outputKey": "sheet label" }` objects) as query parameters.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sheetproxy_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env();
//! let server = ApiServer::new(config)?;
//! server.run(([0, 0, 0, 0], 3000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use handlers::{ARRAY_DATA_PRODUCER, OBJECT_PRODUCER};
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for sheetproxy.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> sheetproxy_core::Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::new(config)?),
        })
    }

    /// Shared state of the server.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes configured.
    ///
    /// CORS is wide open outside production.
    pub fn router(&self) -> Router {
        let router = create_router(self.state.clone());

        let router = if self.state.config.production {
            router
        } else {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router.layer(cors)
        };

        router.layer(TraceLayer::new_for_http())
    }

    /// Starts the cache sweeper and serves on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        if self.state.config.enable_cache {
            self.state.scheduler.start();
        }

        info!("sheetproxy API server listening on {}", addr);

        let result = axum::serve(listener, self.router()).await;
        self.state.scheduler.stop();
        result
    }
}
