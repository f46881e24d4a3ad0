//! API route handlers.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::debug;

use sheetproxy_core::types::FormatMapping;

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

/// Cache partition of `GET /api/array-data-from-sheet`.
pub const ARRAY_DATA_PRODUCER: &str = "array-data-from-sheet";
/// Cache partition of `GET /api/object-from-sheet`.
pub const OBJECT_PRODUCER: &str = "object-from-sheet";

type SheetArgs = (String, Option<String>, FormatMapping);

/// GET /
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello world".into(),
    })
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        started_at: state.started_at,
        uptime_seconds: (Utc::now() - state.started_at).num_seconds(),
        cache_enabled: state.config.enable_cache,
        cached_entries: state.cache.count_cached_entries(),
        scheduler_running: state.scheduler.is_running(),
    })
}

/// GET /api/array-data-from-sheet
pub async fn array_data_from_sheet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SheetQuery>,
) -> Result<Json<Value>> {
    let request = SheetRequest::try_from(query)?;
    let sheets = &state.sheets;

    let value = memoized(&state, ARRAY_DATA_PRODUCER, request.into_args(), |(url, sheet, format)| {
        async move { sheets.array_data_from_sheet(&url, sheet.as_deref(), &format).await }
    })
    .await?;

    Ok(Json(value))
}

/// GET /api/object-from-sheet
pub async fn object_from_sheet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SheetQuery>,
) -> Result<Json<Value>> {
    let request = SheetRequest::try_from(query)?;
    let sheets = &state.sheets;

    let value = memoized(&state, OBJECT_PRODUCER, request.into_args(), |(url, sheet, format)| {
        async move { sheets.object_from_sheet(&url, sheet.as_deref(), &format).await }
    })
    .await?;

    Ok(Json(value))
}

/// Runs a sheet fetch through the proxy cache, unless caching is disabled.
async fn memoized<F, Fut>(
    state: &AppState,
    producer_id: &'static str,
    args: SheetArgs,
    producer: F,
) -> sheetproxy_core::Result<Value>
where
    F: FnOnce(SheetArgs) -> Fut,
    Fut: Future<Output = sheetproxy_core::Result<Value>>,
{
    if state.config.enable_cache {
        state.cache.memoized_call(producer_id, args, producer).await
    } else {
        debug!(producer_id, "Cache disabled, fetching directly");
        producer(args).await
    }
}
