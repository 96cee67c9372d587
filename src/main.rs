use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::task::JoinSet;
use tracing::info;

use ngenix_exporter::cli::Args;
use ngenix_exporter::credentials::{CredentialSource, EnvCredentials};
use ngenix_exporter::endpoints::{EndpointKind, HttpStatuses, StatusTimeline, TopPaths};
use ngenix_exporter::metrics::MetricsSink;
use ngenix_exporter::poller::Poller;
use ngenix_exporter::upstream::UpstreamClient;
use ngenix_exporter::{logging, server, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init();

    // ── 1. Build the sink ────────────────────────────────────────
    let sink = Arc::new(MetricsSink::new().context("registering metrics")?);

    // ── 2. Upstream client + credentials ─────────────────────────
    let client = UpstreamClient::new(args.api_url.clone(), args.request_timeout())
        .context("building http client")?;
    let credentials: Arc<dyn CredentialSource> = Arc::new(EnvCredentials::new(args.config_id));
    info!(api = %client.base_url(), "upstream configured");

    // ── 3. One poller task per enabled endpoint ──────────────────
    let mut pollers = JoinSet::new();
    for kind in args.enabled_endpoints() {
        let interval = args.interval(kind);
        let client = client.clone();
        let credentials = credentials.clone();
        let sink = sink.clone();
        match kind {
            EndpointKind::TopPaths => {
                pollers.spawn(Poller::new(TopPaths, interval, client, credentials, sink).run());
            }
            EndpointKind::HttpStatuses => {
                pollers.spawn(
                    Poller::new(HttpStatuses, interval, client, credentials, sink).run(),
                );
            }
            EndpointKind::StatusTimeline => {
                let endpoint =
                    StatusTimeline::new(args.status_timeline_hour, args.status_timeline_metric);
                pollers.spawn(Poller::new(endpoint, interval, client, credentials, sink).run());
            }
        }
    }

    // ── 4. Bind & serve ──────────────────────────────────────────
    let app = server::create_router(Arc::new(AppState { sink }));

    let addr = args.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited with error")?;

    // ── 5. Tear down ─────────────────────────────────────────────
    pollers.shutdown().await;
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
