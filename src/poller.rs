use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::credentials::CredentialSource;
use crate::endpoints::Endpoint;
use crate::error::FetchError;
use crate::mapper::{self, FoldStats};
use crate::metrics::MetricsSink;
use crate::upstream::UpstreamClient;

/// Scheduled fetch → typed decode → record extraction → sink update, for one
/// endpoint.
pub struct Poller<E: Endpoint> {
    endpoint: E,
    interval: Duration,
    client: UpstreamClient,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<MetricsSink>,
}

impl<E: Endpoint> Poller<E> {
    pub fn new(
        endpoint: E,
        interval: Duration,
        client: UpstreamClient,
        credentials: Arc<dyn CredentialSource>,
        sink: Arc<MetricsSink>,
    ) -> Self {
        Self {
            endpoint,
            interval,
            client,
            credentials,
            sink,
        }
    }

    /// One complete tick against the window anchored on `day`.
    ///
    /// The sink is only touched once the body decoded and validated, so every
    /// error path leaves it exactly as it was.
    pub async fn poll_once(&self, day: NaiveDate) -> Result<FoldStats, FetchError> {
        let credentials = self.credentials.load()?;

        let query = self.endpoint.query(credentials.config_id, day);
        let url = self.client.endpoint_url(self.endpoint.path(), &query)?;
        debug!(endpoint = self.endpoint.kind().as_str(), %url, "fetching");

        let response: E::Response = self.client.get_json(url, &credentials).await?;
        self.endpoint.validate(&response)?;

        let records = self.endpoint.records(&response);
        Ok(mapper::fold(
            &self.sink,
            self.endpoint.target(),
            self.endpoint.histogram(),
            &records,
        ))
    }

    /// Polls forever. Ticks never overlap: a slow request pushes the next
    /// tick back instead of bunching up missed ones.
    pub async fn run(self) {
        let name = self.endpoint.kind().as_str();
        info!(endpoint = name, interval = ?self.interval, "poller started");

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        while ticks.next().await.is_some() {
            let started = Instant::now();
            match self.poll_once(Local::now().date_naive()).await {
                Ok(stats) => debug!(
                    endpoint = name,
                    applied = stats.applied,
                    skipped = stats.skipped,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "poll complete"
                ),
                Err(err) => warn!(
                    endpoint = name,
                    kind = err.kind(),
                    error = %err,
                    "poll failed, skipping tick"
                ),
            }
        }
    }
}
