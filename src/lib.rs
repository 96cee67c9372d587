//! Polls the NGENIX analytics API and republishes the numbers as Prometheus
//! metrics.

use std::sync::Arc;

pub mod cli;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod mapper;
pub mod metrics;
pub mod middleware;
pub mod poller;
pub mod server;
pub mod upstream;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Written by the pollers, read by the scrape handlers.
    pub sink: Arc<metrics::MetricsSink>,
}
