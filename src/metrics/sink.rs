use std::collections::BTreeMap;

use parking_lot::Mutex;
use prometheus::proto::MetricType;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts,
    Registry, TextEncoder,
};

use super::SnapshotEntry;

// ─── Naming ──────────────────────────────────────────────────────

const NAMESPACE: &str = "ngenix";
const SUBSYSTEM: &str = "realtime";

fn opts(name: &str, help: &str) -> Opts {
    Opts::new(name, help).namespace(NAMESPACE).subsystem(SUBSYSTEM)
}

// ─── Public types ────────────────────────────────────────────────

/// Replace-on-write series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gauge {
    RequestsByPath,
    RequestsByCode,
}

/// Add-only series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    RequestsByStatus,
}

/// Per-label distributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Histogram {
    RequestsTotal,
}

/// Where an endpoint's records end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Gauge(Gauge),
    Counter(Counter),
}

/// Every series the exporter publishes, behind its own registry.
///
/// Created once at startup and shared by `Arc` between the pollers (writers)
/// and the HTTP handlers (readers). Nothing is ever removed: a label value
/// keeps its last value until the process exits.
pub struct MetricsSink {
    registry: Registry,
    requests_by_path: GaugeVec,
    requests_by_code: GaugeVec,
    requests_by_status: CounterVec,
    requests_total: HistogramVec,
    /// Serializes counter batches so two folds never interleave their adds.
    counter_lock: Mutex<()>,
}

// ─── MetricsSink impl ────────────────────────────────────────────

impl MetricsSink {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_by_path = GaugeVec::new(
            opts("requests_by_path", "Realtime requests grouped by path"),
            &["path"],
        )?;
        let requests_by_code = GaugeVec::new(
            opts("requests_by_code", "Realtime requests grouped by code"),
            &["code"],
        )?;
        let requests_by_status = CounterVec::new(
            opts(
                "requests_by_status_total",
                "Realtime timeline values accumulated per HTTP status",
            ),
            &["httpStatus"],
        )?;
        let requests_total = HistogramVec::new(
            HistogramOpts::from(opts(
                "requests_total",
                "Total count of realtime requests",
            ))
            .buckets(exponential_buckets(1.0, 4.0, 10)?),
            &["path"],
        )?;

        registry.register(Box::new(requests_by_path.clone()))?;
        registry.register(Box::new(requests_by_code.clone()))?;
        registry.register(Box::new(requests_by_status.clone()))?;
        registry.register(Box::new(requests_total.clone()))?;

        Ok(Self {
            registry,
            requests_by_path,
            requests_by_code,
            requests_by_status,
            requests_total,
            counter_lock: Mutex::new(()),
        })
    }

    fn gauge_vec(&self, gauge: Gauge) -> &GaugeVec {
        match gauge {
            Gauge::RequestsByPath => &self.requests_by_path,
            Gauge::RequestsByCode => &self.requests_by_code,
        }
    }

    fn counter_vec(&self, counter: Counter) -> &CounterVec {
        match counter {
            Counter::RequestsByStatus => &self.requests_by_status,
        }
    }

    /// Last write wins.
    pub fn set(&self, gauge: Gauge, label: &str, value: f64) {
        self.gauge_vec(gauge).with_label_values(&[label]).set(value);
    }

    pub fn observe(&self, histogram: Histogram, label: &str, value: f64) {
        let vec = match histogram {
            Histogram::RequestsTotal => &self.requests_total,
        };
        vec.with_label_values(&[label]).observe(value);
    }

    /// Adds a whole batch while holding the counter lock.
    ///
    /// Callers must only pass positive deltas; the registry rejects
    /// decreasing counters.
    pub fn add_all<'a, I>(&self, counter: Counter, deltas: I)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let vec = self.counter_vec(counter);
        let _guard = self.counter_lock.lock();
        for (label, delta) in deltas {
            vec.with_label_values(&[label]).inc_by(delta);
        }
    }

    /// Renders every registered family in the text exposition format.
    pub fn encode(&self) -> prometheus::Result<Vec<u8>> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(buf)
    }

    /// Reads one series without creating it.
    ///
    /// `name` is the fully qualified metric name, e.g.
    /// `ngenix_realtime_requests_by_path`.
    pub fn sample(&self, name: &str, label_value: &str) -> Option<f64> {
        self.snapshot().into_iter().find_map(|entry| {
            (entry.name == name && entry.labels.values().any(|v| v == label_value))
                .then_some(entry.value)
        })
    }

    /// Flat list of every series currently held, in registry order.
    ///
    /// Histograms appear as their `_count` and `_sum` series; buckets are
    /// only in the text exposition.
    pub fn snapshot(&self) -> Vec<SnapshotEntry> {
        let mut entries = Vec::new();
        for family in self.registry.gather() {
            let name = family.get_name();
            for metric in family.get_metric() {
                let labels: BTreeMap<String, String> = metric
                    .get_label()
                    .iter()
                    .map(|pair| (pair.get_name().to_string(), pair.get_value().to_string()))
                    .collect();
                let mut push = |name: String, kind: &'static str, value: f64| {
                    entries.push(SnapshotEntry {
                        name,
                        kind,
                        labels: labels.clone(),
                        value,
                    });
                };
                match family.get_field_type() {
                    MetricType::GAUGE => {
                        push(name.to_string(), "gauge", metric.get_gauge().get_value())
                    }
                    MetricType::COUNTER => {
                        push(name.to_string(), "counter", metric.get_counter().get_value())
                    }
                    MetricType::HISTOGRAM => {
                        let h = metric.get_histogram();
                        push(format!("{name}_count"), "histogram", h.get_sample_count() as f64);
                        push(format!("{name}_sum"), "histogram", h.get_sample_sum());
                    }
                    _ => {}
                }
            }
        }
        entries
    }
}
