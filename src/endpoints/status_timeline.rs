use tracing::trace;

use super::{Endpoint, EndpointKind};
use crate::error::FetchError;
use crate::mapper::Record;
use crate::metrics::{Counter, Target};
use crate::upstream::responses::{MetricField, TimelineReport};
use crate::upstream::TimeWindow;

/// Resolution of the timeline, in seconds.
const POINT_INTERVAL_SECS: u32 = 30;

/// `timeline/configs` grouped by HTTP status over a fixed one-hour window.
///
/// Every point of every series is added to a counter, so repeated polls of
/// the same window keep accumulating.
#[derive(Debug, Clone, Copy)]
pub struct StatusTimeline {
    hour: u8,
    metric: MetricField,
}

impl StatusTimeline {
    pub fn new(hour: u8, metric: MetricField) -> Self {
        Self { hour, metric }
    }
}

impl Default for StatusTimeline {
    fn default() -> Self {
        Self::new(9, MetricField::RealtimeRequests)
    }
}

impl Endpoint for StatusTimeline {
    type Response = TimelineReport;

    fn kind(&self) -> EndpointKind {
        EndpointKind::StatusTimeline
    }

    fn path(&self) -> &'static str {
        "/reports/v1/timeline/configs"
    }

    fn window(&self) -> TimeWindow {
        TimeWindow::Hour(self.hour)
    }

    fn metric(&self) -> MetricField {
        self.metric
    }

    fn target(&self) -> Target {
        Target::Counter(Counter::RequestsByStatus)
    }

    fn extra_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("interval", POINT_INTERVAL_SECS.to_string()),
            ("groupBy", "httpStatus".to_string()),
        ]
    }

    fn validate(&self, report: &TimelineReport) -> Result<(), FetchError> {
        match report.data {
            Some(_) => Ok(()),
            None => Err(FetchError::Incomplete("data")),
        }
    }

    fn records(&self, report: &TimelineReport) -> Vec<Record> {
        let mut records = Vec::new();
        for series in report.data.iter().flatten() {
            for value in &series.values {
                // 0, negatives and non-HTTP codes mean the key was unusable
                let status = value.grouped_by.status_code();
                if let Some(status) = status {
                    trace!(
                        status,
                        description = report.describe_status(status),
                        timestamp = ?series.timestamp,
                        "timeline point"
                    );
                }
                let label = status.map(|s| s.to_string()).unwrap_or_default();
                records.push(Record::new(label, value.metrics.get(self.metric)));
            }
        }
        records
    }
}
