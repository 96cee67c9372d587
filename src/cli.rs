//! Command-line arguments. Every flag except `--config-id` can also be set
//! through the environment variable named next to it; the config id already
//! has `NGENIX_CONFIG_ID`, read per tick by the credential source.

use std::time::Duration;

use clap::Parser;
use url::Url;

use crate::endpoints::EndpointKind;
use crate::upstream::responses::MetricField;
use crate::upstream::DEFAULT_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ngenix-exporter",
    version,
    about = "Exports NGENIX realtime analytics as Prometheus metrics"
)]
pub struct Args {
    /// The address to listen on for HTTP requests
    #[arg(long, default_value = ":8080", env = "LISTEN_ADDRESS")]
    pub listen_address: String,

    /// Base URL of the analytics API
    #[arg(long, default_value = DEFAULT_BASE_URL, env = "NGENIX_API_URL")]
    pub api_url: Url,

    /// Config id to query; takes precedence over NGENIX_CONFIG_ID
    #[arg(long)]
    pub config_id: Option<u64>,

    /// Endpoints to poll
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = EndpointKind::ALL,
        env = "NGENIX_ENDPOINTS"
    )]
    pub endpoints: Vec<EndpointKind>,

    /// Seconds between top100 polls
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "NGENIX_TOP_PATHS_INTERVAL_SECS"
    )]
    pub top_paths_interval_secs: u64,

    /// Seconds between httpstatuses polls
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "NGENIX_HTTP_STATUSES_INTERVAL_SECS"
    )]
    pub http_statuses_interval_secs: u64,

    /// Seconds between timeline polls
    #[arg(
        long,
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..),
        env = "NGENIX_STATUS_TIMELINE_INTERVAL_SECS"
    )]
    pub status_timeline_interval_secs: u64,

    /// Hour of day (0-23) covered by the timeline window
    #[arg(
        long,
        default_value_t = 9,
        value_parser = clap::value_parser!(u8).range(0..=23),
        env = "NGENIX_STATUS_TIMELINE_HOUR"
    )]
    pub status_timeline_hour: u8,

    /// Metric accumulated from the timeline
    #[arg(
        long,
        value_enum,
        default_value_t = MetricField::RealtimeRequests,
        env = "NGENIX_STATUS_TIMELINE_METRIC"
    )]
    pub status_timeline_metric: MetricField,

    /// Upstream request timeout in seconds (default: none)
    #[arg(long, env = "NGENIX_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,
}

impl Args {
    /// `:8080` means every interface, as Go-style listeners do.
    #[must_use]
    pub fn listen_addr(&self) -> String {
        if self.listen_address.starts_with(':') {
            format!("0.0.0.0{}", self.listen_address)
        } else {
            self.listen_address.clone()
        }
    }

    #[must_use]
    pub fn interval(&self, kind: EndpointKind) -> Duration {
        let secs = match kind {
            EndpointKind::TopPaths => self.top_paths_interval_secs,
            EndpointKind::HttpStatuses => self.http_statuses_interval_secs,
            EndpointKind::StatusTimeline => self.status_timeline_interval_secs,
        };
        Duration::from_secs(secs)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Enabled endpoints without duplicates, in the order given.
    #[must_use]
    pub fn enabled_endpoints(&self) -> Vec<EndpointKind> {
        let mut seen = Vec::with_capacity(self.endpoints.len());
        for kind in &self.endpoints {
            if !seen.contains(kind) {
                seen.push(*kind);
            }
        }
        seen
    }
}
