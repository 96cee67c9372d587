#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use url::Url;

use ngenix_exporter::credentials::{CredentialSource, Credentials};
use ngenix_exporter::endpoints::Endpoint;
use ngenix_exporter::metrics::MetricsSink;
use ngenix_exporter::poller::Poller;
use ngenix_exporter::upstream::UpstreamClient;

/// What the mock saw for one request.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
}

/// Analytics API stand-in answering every request with the same status/body.
pub struct MockUpstream {
    pub base_url: Url,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<Seen>>>,
    task: JoinHandle<()>,
}

impl MockUpstream {
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback({
            let hits = hits.clone();
            let seen = seen.clone();
            move |req: Request| {
                let hits = hits.clone();
                let seen = seen.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    seen.lock().push(Seen {
                        path: req.uri().path().to_string(),
                        query: req.uri().query().unwrap_or_default().to_string(),
                        authorization: req
                            .headers()
                            .get(header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                    });
                    (status, [(header::CONTENT_TYPE, "application/json")], body)
                }
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/")).unwrap(),
            hits,
            seen,
            task,
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Seen {
        self.seen.lock().last().cloned().expect("no request seen")
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        username: "user".into(),
        password: "secret".into(),
        config_id: 91051,
    }
}

pub fn poller<E: Endpoint>(
    endpoint: E,
    upstream: &MockUpstream,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<MetricsSink>,
) -> Poller<E> {
    poller_every(endpoint, Duration::from_secs(30), upstream, credentials, sink)
}

pub fn poller_every<E: Endpoint>(
    endpoint: E,
    interval: Duration,
    upstream: &MockUpstream,
    credentials: Arc<dyn CredentialSource>,
    sink: Arc<MetricsSink>,
) -> Poller<E> {
    let client = UpstreamClient::new(upstream.base_url.clone(), Some(Duration::from_secs(5))).unwrap();
    Poller::new(endpoint, interval, client, credentials, sink)
}
