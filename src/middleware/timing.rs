use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

/// `app;dur=<ms>` with microsecond precision.
fn server_timing(elapsed: Duration) -> Option<HeaderValue> {
    let ms = elapsed.as_secs_f64() * 1000.0;
    HeaderValue::from_str(&format!("app;dur={ms:.3}")).ok()
}

/// Stamps every response with how long the handler took and logs the request
/// at debug level.
pub async fn server_timing_layer(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let mut response = next.run(req).await;
    let elapsed = started.elapsed();

    if let Some(value) = server_timing(elapsed) {
        response.headers_mut().insert(SERVER_TIMING, value);
    }
    debug!(
        %method,
        path = uri.path(),
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "handled scrape"
    );

    response
}
