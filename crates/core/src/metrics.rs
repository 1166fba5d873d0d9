//! Catalog of selectable metrics

use crate::data::MetricKey;
use crate::format::{format_latency, format_thousands};

/// A metric the dashboard can display
#[derive(Debug, Clone, Copy)]
pub struct ComparedMetric {
    pub key: MetricKey,
    pub title: &'static str,
    pub long_title: Option<&'static str>,
    /// Applied after rounding
    pub format: Option<fn(f64) -> String>,
    pub round: bool,
}

impl ComparedMetric {
    const fn new(key: MetricKey, title: &'static str) -> Self {
        Self {
            key,
            title,
            long_title: None,
            format: None,
            round: false,
        }
    }

    const fn long(mut self, long_title: &'static str) -> Self {
        self.long_title = Some(long_title);
        self
    }

    const fn count(mut self) -> Self {
        self.round = true;
        self.format = Some(format_thousands as fn(f64) -> String);
        self
    }

    const fn latency(mut self) -> Self {
        self.format = Some(format_latency as fn(f64) -> String);
        self
    }

    /// Heading for charts: the long title when there is one
    pub fn heading(&self) -> &'static str {
        self.long_title.unwrap_or(self.title)
    }

    /// Rendered value: round first, then format. The raw value is left untouched.
    pub fn display(&self, raw: f64) -> String {
        let value = if self.round { raw.round() } else { raw };
        match self.format {
            Some(format) => format(value),
            None => value.to_string(),
        }
    }

    pub fn is_latency(&self) -> bool {
        is_latency_metric(self.key)
    }
}

static STANDARD_METRICS: [ComparedMetric; 17] = [
    ComparedMetric::new(MetricKey::TotalRequestsPerS, "Requests / Second")
        .long("Requests per Second")
        .count(),
    ComparedMetric::new(MetricKey::TotalRequests, "Total Requests")
        .long("Total Request in 15 seconds")
        .count(),
    ComparedMetric::new(MetricKey::Percentile50, "P50 Latency")
        .long("50th Percentile Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::Percentile75, "P75 Latency")
        .long("75th Percentile Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::Percentile90, "P90 Latency")
        .long("90th Percentile Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::Percentile99, "P99 Latency")
        .long("99th Percentile Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::Percentile99999, "P99.999 Latency")
        .long("99.999th Percentile Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::AverageLatency, "Average Latency")
        .long("Average Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::MinimumLatency, "Minimum Latency")
        .long("Minimum Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::MaximumLatency, "Maximum Latency")
        .long("Maximum Latency (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::StandardDeviation, "Latency Std. Deviation")
        .long("Latency Standard Deviation (ms)")
        .latency(),
    ComparedMetric::new(MetricKey::HttpErrors, "HTTP Errors").count(),
    ComparedMetric::new(MetricKey::RequestTimeouts, "Request Timeouts").count(),
    ComparedMetric::new(MetricKey::SocketConnectionErrors, "Socket Connection Errors").count(),
    ComparedMetric::new(MetricKey::SocketReadErrors, "Socket Read Errors").count(),
    ComparedMetric::new(MetricKey::SocketWriteErrors, "Socket Write Errors").count(),
    ComparedMetric::new(MetricKey::TotalBytesReceived, "Bytes Received").count(),
];

/// Latency metrics, stored in microseconds
const LATENCY_METRICS: [MetricKey; 9] = [
    MetricKey::Percentile50,
    MetricKey::Percentile75,
    MetricKey::Percentile90,
    MetricKey::Percentile99,
    MetricKey::Percentile99999,
    MetricKey::AverageLatency,
    MetricKey::MinimumLatency,
    MetricKey::MaximumLatency,
    MetricKey::StandardDeviation,
];

pub fn is_latency_metric(key: MetricKey) -> bool {
    LATENCY_METRICS.contains(&key)
}

/// Metric selected when none (or an unknown one) is requested
pub const DEFAULT_METRIC: MetricKey = MetricKey::TotalRequestsPerS;

/// Fixed, ordered list of selectable metrics
#[derive(Debug, Clone, Copy)]
pub struct MetricCatalog {
    metrics: &'static [ComparedMetric],
}

impl MetricCatalog {
    pub fn standard() -> Self {
        Self {
            metrics: &STANDARD_METRICS,
        }
    }

    pub fn metrics(&self) -> &'static [ComparedMetric] {
        self.metrics
    }

    pub fn lookup(&self, key: MetricKey) -> Option<&'static ComparedMetric> {
        self.metrics.iter().find(|m| m.key == key)
    }

    pub fn contains(&self, key: MetricKey) -> bool {
        self.lookup(key).is_some()
    }

    /// The entry for `key`, or the default metric's entry
    pub fn lookup_or_default(&self, key: MetricKey) -> &'static ComparedMetric {
        self.lookup(key)
            .or_else(|| self.lookup(DEFAULT_METRIC))
            .unwrap_or(&self.metrics[0])
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
