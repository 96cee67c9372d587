mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::NaiveDate;
use tower::ServiceExt;

use common::{credentials, poller, MockUpstream};
use ngenix_exporter::endpoints::{HttpStatuses, StatusTimeline, TopPaths};
use ngenix_exporter::metrics::MetricsSink;
use ngenix_exporter::{server, AppState};

async fn scrape(sink: Arc<MetricsSink>) -> String {
    let app = server::create_router(Arc::new(AppState { sink }));
    let resp = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn pollers_share_one_sink_and_scrape_shows_all_families() {
    let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let sink = Arc::new(MetricsSink::new().unwrap());
    let creds = Arc::new(credentials());

    let paths = MockUpstream::start(
        StatusCode::OK,
        r#"{"categories":[{"name":"/index","metrics":{"realtimeRequests":42}}]}"#,
    )
    .await;
    let codes = MockUpstream::start(
        StatusCode::OK,
        r#"{"categories":[{"name":"200","metrics":{"realtimeRequests":9}}]}"#,
    )
    .await;
    let timeline = MockUpstream::start(
        StatusCode::OK,
        r#"{"data":[{"values":[{"groupedBy":{"httpStatus":502},"metrics":{"realtimeRequests":4}}]}]}"#,
    )
    .await;

    poller(TopPaths, &paths, creds.clone(), sink.clone())
        .poll_once(day)
        .await
        .unwrap();
    poller(HttpStatuses, &codes, creds.clone(), sink.clone())
        .poll_once(day)
        .await
        .unwrap();
    poller(StatusTimeline::default(), &timeline, creds, sink.clone())
        .poll_once(day)
        .await
        .unwrap();

    let text = scrape(sink).await;
    assert!(text.contains(r#"ngenix_realtime_requests_by_path{path="/index"} 42"#));
    assert!(text.contains(r#"ngenix_realtime_requests_by_code{code="200"} 9"#));
    assert!(text.contains(r#"ngenix_realtime_requests_by_status_total{httpStatus="502"} 4"#));
    assert!(text.contains("# TYPE ngenix_realtime_requests_by_status_total counter"));
    assert!(text.contains("# TYPE ngenix_realtime_requests_total histogram"));
    assert!(text.contains(r#"ngenix_realtime_requests_total_count{path="/index"} 1"#));
}

#[tokio::test]
async fn stale_series_stay_visible_after_upstream_stops_reporting_them() {
    let day = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
    let sink = Arc::new(MetricsSink::new().unwrap());

    let before = MockUpstream::start(
        StatusCode::OK,
        r#"{"categories":[{"name":"/old","metrics":{"realtimeRequests":3}}]}"#,
    )
    .await;
    let after = MockUpstream::start(
        StatusCode::OK,
        r#"{"categories":[{"name":"/new","metrics":{"realtimeRequests":8}}]}"#,
    )
    .await;

    poller(TopPaths, &before, Arc::new(credentials()), sink.clone())
        .poll_once(day)
        .await
        .unwrap();
    poller(TopPaths, &after, Arc::new(credentials()), sink.clone())
        .poll_once(day)
        .await
        .unwrap();

    let text = scrape(sink).await;
    assert!(text.contains(r#"ngenix_realtime_requests_by_path{path="/old"} 3"#));
    assert!(text.contains(r#"ngenix_realtime_requests_by_path{path="/new"} 8"#));
}
