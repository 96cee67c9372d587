//! Typed shapes of the analytics API responses.
//!
//! Only the fields the exporter reads are strict; everything else is optional
//! and unknown keys are ignored, so upstream additions never break decoding.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Shared pieces ───────────────────────────────────────────────

/// Which numeric field of a `metrics` object to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum MetricField {
    RealtimeRequests,
    RealtimeTraffic,
}

impl MetricField {
    /// Name used both in the `metrics=` query parameter and in the response.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RealtimeRequests => "realtimeRequests",
            Self::RealtimeTraffic => "realtimeTraffic",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValues {
    #[serde(default, deserialize_with = "null_as_default")]
    pub realtime_requests: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub realtime_traffic: f64,
}

impl MetricValues {
    pub fn get(&self, field: MetricField) -> f64 {
        match field {
            MetricField::RealtimeRequests => self.realtime_requests,
            MetricField::RealtimeTraffic => self.realtime_traffic,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    pub config_id: Option<u64>,
    pub model_name: Option<String>,
}

/// Echo of the request parameters. `groupBy` comes back either as plain
/// strings or as ad hoc objects depending on the endpoint, so it stays raw.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEcho {
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: Vec<String>,
    pub filters: Option<Filters>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub group_by: Vec<serde_json::Value>,
    pub date: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub interval: Option<u32>,
    pub model_name: Option<String>,
}

// ─── top100 / httpstatuses ───────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: MetricValues,
}

/// Flat category list returned by the analytical endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: QueryEcho,
    pub categories: Option<Vec<Category>>,
    pub model_name: Option<String>,
}

// ─── timeline/configs ────────────────────────────────────────────

/// Valid HTTP status codes. Anything else coming back in `groupedBy` is
/// treated as an absent key.
const HTTP_STATUS_RANGE: std::ops::RangeInclusive<i64> = 100..=599;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedBy {
    /// Kept signed so negative or oversized codes still decode.
    pub http_status: Option<i64>,
}

impl GroupedBy {
    /// The grouping status, if it is a real HTTP status code.
    pub fn status_code(&self) -> Option<i64> {
        self.http_status.filter(|s| HTTP_STATUS_RANGE.contains(s))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineValue {
    #[serde(default, deserialize_with = "null_as_default")]
    pub grouped_by: GroupedBy,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: MetricValues,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimelineSeries {
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<TimelineValue>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct SummaryStats {
    #[serde(default, deserialize_with = "null_as_default")]
    pub min: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub max: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avg: f64,
}

/// Per-field aggregates; a field is `None` unless it was requested.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub realtime_requests: Option<SummaryStats>,
    pub realtime_traffic: Option<SummaryStats>,
}

impl SummaryMetrics {
    pub fn get(&self, field: MetricField) -> Option<SummaryStats> {
        match field {
            MetricField::RealtimeRequests => self.realtime_requests,
            MetricField::RealtimeTraffic => self.realtime_traffic,
        }
    }
}

/// Aggregate over the whole window for one group.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    #[serde(default, deserialize_with = "null_as_default")]
    pub grouped_by: GroupedBy,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metrics: SummaryMetrics,
}

/// Time series grouped by a dimension, one point per `interval` seconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub query: QueryEcho,
    /// dimension → code → human readable description
    #[serde(default, deserialize_with = "null_as_default")]
    pub grouped_by_values_description: BTreeMap<String, BTreeMap<String, String>>,
    pub data: Option<Vec<TimelineSeries>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: Vec<TimelineSummary>,
    pub model_name: Option<String>,
}

impl TimelineReport {
    pub fn describe_status(&self, status: i64) -> Option<&str> {
        self.grouped_by_values_description
            .get("httpStatus")?
            .get(&status.to_string())
            .map(String::as_str)
    }
}
