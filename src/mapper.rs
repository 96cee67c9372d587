use tracing::trace;

use crate::metrics::{Histogram, MetricsSink, Target};

/// One `(label, value)` pair pulled out of a decoded response.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub label: String,
    pub value: f64,
}

impl Record {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    pub applied: usize,
    pub skipped: usize,
}

/// Empty labels and zero values are ignored. Counters additionally refuse
/// anything that would not move them forward.
pub fn accepts(target: Target, record: &Record) -> bool {
    if record.label.is_empty() || record.value == 0.0 || !record.value.is_finite() {
        return false;
    }
    match target {
        Target::Gauge(_) => true,
        Target::Counter(_) => record.value > 0.0,
    }
}

/// Writes every accepted record into the sink, and into `histogram` too when
/// the endpoint keeps a distribution alongside its main series.
pub fn fold(
    sink: &MetricsSink,
    target: Target,
    histogram: Option<Histogram>,
    records: &[Record],
) -> FoldStats {
    let mut accepted = Vec::with_capacity(records.len());
    for record in records {
        if accepts(target, record) {
            accepted.push(record);
        } else {
            trace!(label = %record.label, value = record.value, "skipping record");
        }
    }

    let stats = FoldStats {
        applied: accepted.len(),
        skipped: records.len() - accepted.len(),
    };

    if let Some(histogram) = histogram {
        for record in &accepted {
            sink.observe(histogram, &record.label, record.value);
        }
    }

    match target {
        Target::Gauge(gauge) => {
            for record in accepted {
                sink.set(gauge, &record.label, record.value);
            }
        }
        Target::Counter(counter) => {
            sink.add_all(
                counter,
                accepted.into_iter().map(|r| (r.label.as_str(), r.value)),
            );
        }
    }

    stats
}
