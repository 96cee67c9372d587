pub mod sink;

use std::collections::BTreeMap;

use serde::Serialize;

pub use sink::{Counter, Gauge, Histogram, MetricsSink, Target};

/// One series as shown by the JSON debug endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotEntry {
    /// Fully qualified name, e.g. `ngenix_realtime_requests_by_code`
    pub name: String,
    /// "gauge", "counter" or "histogram"
    pub kind: &'static str,
    pub labels: BTreeMap<String, String>,
    pub value: f64,
}
