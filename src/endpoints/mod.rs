//! The analytics endpoints the exporter knows how to poll.
//!
//! Each one is a small value implementing [`Endpoint`]: where to send the
//! request, which window to ask for, how to check the response, and how to
//! turn it into sink records. The poller itself is shared.

mod categories;
pub mod status_timeline;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use crate::error::FetchError;
use crate::mapper::Record;
use crate::metrics::{Histogram, Target};
use crate::upstream::responses::MetricField;
use crate::upstream::TimeWindow;

pub use categories::{HttpStatuses, TopPaths};
pub use status_timeline::StatusTimeline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum EndpointKind {
    TopPaths,
    HttpStatuses,
    StatusTimeline,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 3] = [Self::TopPaths, Self::HttpStatuses, Self::StatusTimeline];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopPaths => "top_paths",
            Self::HttpStatuses => "http_statuses",
            Self::StatusTimeline => "status_timeline",
        }
    }
}

pub trait Endpoint: Send + Sync + 'static {
    type Response: DeserializeOwned + Send;

    fn kind(&self) -> EndpointKind;

    /// Absolute path under the API host.
    fn path(&self) -> &'static str;

    fn window(&self) -> TimeWindow;

    fn metric(&self) -> MetricField;

    fn target(&self) -> Target;

    /// Optional distribution fed from the same accepted records.
    fn histogram(&self) -> Option<Histogram> {
        None
    }

    /// Parameters appended after the common ones.
    fn extra_query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    /// Rejects a decoded body that is missing the part we read from.
    fn validate(&self, response: &Self::Response) -> Result<(), FetchError>;

    fn records(&self, response: &Self::Response) -> Vec<Record>;

    /// `configId`, the window, `metrics`, then [`Endpoint::extra_query`].
    fn query(&self, config_id: u64, day: NaiveDate) -> Vec<(&'static str, String)> {
        let mut query = vec![("configId", config_id.to_string())];
        query.extend(self.window().query_pairs(day));
        query.push(("metrics", self.metric().as_str().to_string()));
        query.extend(self.extra_query());
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_have_distinct_log_names() {
        let names: Vec<_> = EndpointKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["top_paths", "http_statuses", "status_timeline"]);
    }
}
