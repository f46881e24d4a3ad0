//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::hello))
        // Health check
        .route("/health", get(handlers::health_check))
        // Sheet reshaping
        .route("/api/array-data-from-sheet", get(handlers::array_data_from_sheet))
        .route("/api/object-from-sheet", get(handlers::object_from_sheet))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::state::ApiConfig;

    const SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1";

    fn sheet_content() -> Value {
        json!({
            "range": "sheet1!A1:Z1000",
            "majorDimension": "ROWS",
            "values": [
                ["name", "where to find", "labels"],
                ["ZGST", "https://zgst.am/", "clothes"],
                ["Dufflebag", "https://dufflebag.am/", "bags"],
                ["Lernetsee", "https://it-it.facebook.com/lernetsee/", "books"]
            ]
        })
    }

    /// Mock Sheets API answering `sheet1` of spreadsheet `1`, expecting `calls` hits.
    async fn mock_sheets(calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/spreadsheets/1/values/sheet1!A:Z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sheet_content()))
            .expect(calls)
            .mount(&server)
            .await;
        server
    }

    fn test_state(server: &MockServer, enable_cache: bool) -> Arc<AppState> {
        let config = ApiConfig {
            google_api_key: Some("test-key".into()),
            sheets_api_base_url: server.uri(),
            enable_cache,
            ..ApiConfig::default()
        };
        Arc::new(AppState::new(config).unwrap())
    }

    fn sheet_uri(route: &str, url: &str, sheet: &str, format: &Value) -> String {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("spreadsheetUrl", url)
            .append_pair("sheet", sheet)
            .append_pair("format", &format.to_string())
            .finish();
        format!("{}?{}", route, query)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn object_format() -> Value {
        json!([{ "zgst": "ZGST" }, { "dufflebag": "Dufflebag" }, { "lernetsee": "Lernetsee" }])
    }

    #[tokio::test]
    async fn test_hello_world() {
        let server = MockServer::start().await;
        let app = create_router(test_state(&server, true));

        let (status, body) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Hello world" }));
    }

    #[tokio::test]
    async fn test_health_check() {
        let server = MockServer::start().await;
        let app = create_router(test_state(&server, true));

        let (status, body) = get(app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["cachedEntries"], 0);
        assert_eq!(body["cacheEnabled"], true);
        assert_eq!(body["schedulerRunning"], false);
        assert!(body["uptimeSeconds"].is_i64());
        assert!(body.get("cached_entries").is_none());
    }

    #[tokio::test]
    async fn test_array_data_from_sheet() {
        let server = mock_sheets(1).await;
        let app = create_router(test_state(&server, true));
        let format = json!([{ "whereToFind": "where to find" }]);

        let (status, body) = get(
            app,
            &sheet_uri("/api/array-data-from-sheet", SHEET_URL, "sheet1", &format),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        for row in rows {
            assert!(row.get("name").is_some());
            assert!(row.get("whereToFind").is_some());
            assert!(row.get("labels").is_some());
        }
    }

    #[tokio::test]
    async fn test_object_from_sheet() {
        let server = mock_sheets(1).await;
        let app = create_router(test_state(&server, true));

        let (status, body) = get(
            app,
            &sheet_uri("/api/object-from-sheet", SHEET_URL, "sheet1", &object_format()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "zgst": "https://zgst.am/",
                "dufflebag": "https://dufflebag.am/",
                "lernetsee": "https://it-it.facebook.com/lernetsee/"
            })
        );
    }

    #[tokio::test]
    async fn test_repeated_request_is_served_from_cache() {
        let server = mock_sheets(1).await;
        let state = test_state(&server, true);
        let uri = sheet_uri("/api/object-from-sheet", SHEET_URL, "sheet1", &object_format());

        let (_, first) = get(create_router(state.clone()), &uri).await;
        let (_, second) = get(create_router(state.clone()), &uri).await;

        assert_eq!(first, second);
        assert_eq!(state.cache.count_cached_entries(), 1);
    }

    #[tokio::test]
    async fn test_routes_use_separate_cache_partitions() {
        let server = mock_sheets(2).await;
        let state = test_state(&server, true);
        let format = object_format();

        get(
            create_router(state.clone()),
            &sheet_uri("/api/object-from-sheet", SHEET_URL, "sheet1", &format),
        )
        .await;
        get(
            create_router(state.clone()),
            &sheet_uri("/api/array-data-from-sheet", SHEET_URL, "sheet1", &format),
        )
        .await;

        assert_eq!(state.cache.count_cached_entries(), 2);
    }

    #[tokio::test]
    async fn test_cache_disabled_always_fetches() {
        let server = mock_sheets(2).await;
        let state = test_state(&server, false);
        let uri = sheet_uri("/api/object-from-sheet", SHEET_URL, "sheet1", &object_format());

        get(create_router(state.clone()), &uri).await;
        get(create_router(state.clone()), &uri).await;

        assert_eq!(state.cache.count_cached_entries(), 0);
    }

    #[tokio::test]
    async fn test_missing_spreadsheet_url() {
        let server = mock_sheets(0).await;
        let app = create_router(test_state(&server, true));

        let (status, body) = get(app, "/api/object-from-sheet?sheet=sheet1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_invalid_format() {
        let server = mock_sheets(0).await;
        let app = create_router(test_state(&server, true));

        let (status, _) = get(
            app,
            &sheet_uri("/api/array-data-from-sheet", SHEET_URL, "sheet1", &json!({ "a": "b" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_a_spreadsheet_url() {
        let server = mock_sheets(0).await;
        let app = create_router(test_state(&server, true));

        let (status, body) = get(
            app,
            &sheet_uri("/api/object-from-sheet", "https://google.com", "sheet1", &object_format()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Invalid Google spreadsheet URL");
    }

    #[tokio::test]
    async fn test_unknown_sheet_is_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;
        let state = test_state(&server, true);
        let uri = sheet_uri("/api/object-from-sheet", SHEET_URL, "nope", &object_format());

        let (status, _) = get(create_router(state.clone()), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = get(create_router(state.clone()), &uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        assert_eq!(state.cache.count_cached_entries(), 0);
    }
}
