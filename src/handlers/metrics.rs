use std::sync::Arc;

use axum::{extract::State, http::header, response::IntoResponse, Json};

use super::AppError;
use crate::metrics::SnapshotEntry;
use crate::AppState;

// ─── GET /metrics ────────────────────────────────────────────────
/// Text exposition of every series, for the Prometheus scraper.

pub async fn get_metrics(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let body = state.sink.encode()?;
    Ok(([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body))
}

// ─── GET /api/metrics ────────────────────────────────────────────
/// The same data as JSON, useful for curl / debugging.

pub async fn get_snapshot(
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SnapshotEntry>> {
    Json(state.sink.snapshot())
}
