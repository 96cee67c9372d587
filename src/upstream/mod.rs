pub mod responses;
pub mod window;

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::credentials::Credentials;
use crate::error::FetchError;

pub use window::TimeWindow;

pub const DEFAULT_BASE_URL: &str = "https://api.ngenix.net";

/// Thin wrapper over a shared `reqwest::Client` bound to one API host.
///
/// Cloning is cheap; every clone reuses the same connection pool.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UpstreamClient {
    /// `timeout: None` leaves requests unbounded, matching the plain client
    /// default.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// One authenticated GET. Anything but `200 OK` is an error, and the body
    /// is only decoded once the status has been checked.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        credentials: &Credentials,
    ) -> Result<T, FetchError> {
        let resp = self
            .http
            .get(url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(FetchError::Status(resp.status()));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
