use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;

use crate::handlers;
use crate::middleware::timing;
use crate::AppState;

/// Builds the Axum `Router`: the scrape endpoint plus a JSON view of it.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(handlers::metrics::get_metrics))
        .route("/api/metrics", get(handlers::metrics::get_snapshot))
        .with_state(state)
        .layer(axum_mw::from_fn(timing::server_timing_layer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Gauge, MetricsSink};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            sink: Arc::new(MetricsSink::new().unwrap()),
        })
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn metrics_endpoint_serves_text_exposition() {
        let state = state();
        state.sink.set(Gauge::RequestsByPath, "/index", 42.0);

        let (status, headers, body) = get(create_router(state), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], prometheus::TEXT_FORMAT);
        assert!(headers["server-timing"].to_str().unwrap().starts_with("app;dur="));
        assert!(!headers.contains_key("x-response-time-us"));
        assert!(body.contains(r#"ngenix_realtime_requests_by_path{path="/index"} 42"#));
    }

    #[tokio::test]
    async fn empty_sink_scrapes_cleanly() {
        let (status, _, body) = get(create_router(state()), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn snapshot_endpoint_returns_json() {
        let state = state();
        state.sink.set(Gauge::RequestsByCode, "404", 3.0);

        let (status, _, body) = get(create_router(state), "/api/metrics").await;

        assert_eq!(status, StatusCode::OK);
        let entries: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(entries[0]["name"], "ngenix_realtime_requests_by_code");
        assert_eq!(entries[0]["labels"]["code"], "404");
        assert_eq!(entries[0]["value"], 3.0);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, _, _) = get(create_router(state()), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
