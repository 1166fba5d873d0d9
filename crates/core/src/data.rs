//! Data structures for benchmark payloads and normalized records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of simultaneous client connections used for one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum ConcurrencyLevel {
    C64,
    C256,
    C512,
}

impl ConcurrencyLevel {
    /// Every level under test, in display order
    pub const ALL: [ConcurrencyLevel; 3] = [
        ConcurrencyLevel::C64,
        ConcurrencyLevel::C256,
        ConcurrencyLevel::C512,
    ];

    pub fn value(self) -> u32 {
        match self {
            ConcurrencyLevel::C64 => 64,
            ConcurrencyLevel::C256 => 256,
            ConcurrencyLevel::C512 => 512,
        }
    }

    pub fn from_value(value: u32) -> Option<Self> {
        match value {
            64 => Some(ConcurrencyLevel::C64),
            256 => Some(ConcurrencyLevel::C256),
            512 => Some(ConcurrencyLevel::C512),
            _ => None,
        }
    }

    /// Table column id used in the `order_by` query parameter
    pub fn column_id(self) -> &'static str {
        match self {
            ConcurrencyLevel::C64 => "level64",
            ConcurrencyLevel::C256 => "level256",
            ConcurrencyLevel::C512 => "level512",
        }
    }
}

impl TryFrom<u32> for ConcurrencyLevel {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_value(value).ok_or_else(|| format!("unsupported concurrency level {}", value))
    }
}

impl From<ConcurrencyLevel> for u32 {
    fn from(level: ConcurrencyLevel) -> Self {
        level.value()
    }
}

impl fmt::Display for ConcurrencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A value stored once per concurrency level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerLevel<T> {
    pub level64: T,
    pub level256: T,
    pub level512: T,
}

impl<T> PerLevel<T> {
    pub fn from_fn(mut f: impl FnMut(ConcurrencyLevel) -> T) -> Self {
        Self {
            level64: f(ConcurrencyLevel::C64),
            level256: f(ConcurrencyLevel::C256),
            level512: f(ConcurrencyLevel::C512),
        }
    }

    pub fn get(&self, level: ConcurrencyLevel) -> &T {
        match level {
            ConcurrencyLevel::C64 => &self.level64,
            ConcurrencyLevel::C256 => &self.level256,
            ConcurrencyLevel::C512 => &self.level512,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConcurrencyLevel, &T)> {
        ConcurrencyLevel::ALL.into_iter().map(move |l| (l, self.get(l)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> PerLevel<U> {
        PerLevel::from_fn(|l| f(self.get(l)))
    }
}

/// Metrics collected by the benchmark runner. Closed set, known ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    TotalRequests,
    TotalRequestsPerS,
    AverageLatency,
    Percentile50,
    Percentile75,
    Percentile90,
    Percentile99,
    Percentile99999,
    MinimumLatency,
    MaximumLatency,
    StandardDeviation,
    HttpErrors,
    RequestTimeouts,
    SocketConnectionErrors,
    SocketReadErrors,
    SocketWriteErrors,
    TotalBytesReceived,
    DurationMs,
}

impl MetricKey {
    pub const ALL: [MetricKey; 18] = [
        MetricKey::TotalRequests,
        MetricKey::TotalRequestsPerS,
        MetricKey::AverageLatency,
        MetricKey::Percentile50,
        MetricKey::Percentile75,
        MetricKey::Percentile90,
        MetricKey::Percentile99,
        MetricKey::Percentile99999,
        MetricKey::MinimumLatency,
        MetricKey::MaximumLatency,
        MetricKey::StandardDeviation,
        MetricKey::HttpErrors,
        MetricKey::RequestTimeouts,
        MetricKey::SocketConnectionErrors,
        MetricKey::SocketReadErrors,
        MetricKey::SocketWriteErrors,
        MetricKey::TotalBytesReceived,
        MetricKey::DurationMs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::TotalRequests => "totalRequests",
            MetricKey::TotalRequestsPerS => "totalRequestsPerS",
            MetricKey::AverageLatency => "averageLatency",
            MetricKey::Percentile50 => "percentile50",
            MetricKey::Percentile75 => "percentile75",
            MetricKey::Percentile90 => "percentile90",
            MetricKey::Percentile99 => "percentile99",
            MetricKey::Percentile99999 => "percentile99999",
            MetricKey::MinimumLatency => "minimumLatency",
            MetricKey::MaximumLatency => "maximumLatency",
            MetricKey::StandardDeviation => "standardDeviation",
            MetricKey::HttpErrors => "httpErrors",
            MetricKey::RequestTimeouts => "requestTimeouts",
            MetricKey::SocketConnectionErrors => "socketConnectionErrors",
            MetricKey::SocketReadErrors => "socketReadErrors",
            MetricKey::SocketWriteErrors => "socketWriteErrors",
            MetricKey::TotalBytesReceived => "totalBytesReceived",
            MetricKey::DurationMs => "durationMs",
        }
    }
}

impl FromStr for MetricKey {
    type Err = String;

    /// Accepts the camel-case key as well as its snake_case spelling
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = crate::parser::camel_case(s.trim());
        MetricKey::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| format!("unknown metric '{}'", s))
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every recognized metric for one framework at one concurrency level
pub type MetricMap = BTreeMap<MetricKey, f64>;

/// A version as published by the feed, either `"1.2.3"` or a bare number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    Number(f64),
    Text(String),
}

impl Default for Version {
    fn default() -> Self {
        Version::Text(String::new())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Number(n) => write!(f, "{}", n),
            Version::Text(s) => f.write_str(s),
        }
    }
}

/// A programming language under test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub label: String,
    #[serde(default)]
    pub version: Version,
}

impl Language {
    /// "Go (1.21)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.label, self.version)
    }
}

/// A web framework; `label` is the stable key across revisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Framework {
    pub id: u64,
    pub label: String,
    #[serde(default)]
    pub version: Version,
    /// Label of the language this framework is written in
    pub language: String,
    #[serde(default)]
    pub website: String,
}

impl Framework {
    /// "gin (1.9)"
    pub fn display_name(&self) -> String {
        format!("{} ({})", self.label, self.version)
    }
}

/// One numeric observation from the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    /// Concurrency level, only 64, 256 and 512 are kept
    pub level: u32,
    /// Metric label, see [`MetricKey`]
    pub label: String,
    pub value: f64,
    pub framework_id: u64,
}

/// Operating system of the benchmark host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
    #[serde(default)]
    pub sysname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine: Option<String>,
}

/// Hardware the benchmark was run on
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    #[serde(default)]
    pub cpus: u32,
    #[serde(default)]
    pub cpu_name: String,
    /// Memory in kilobytes
    #[serde(default)]
    pub memory: u64,
    #[serde(default)]
    pub os: OsInfo,
}

impl Hardware {
    /// Memory rounded to whole gigabytes
    pub fn memory_gb(&self) -> u64 {
        (self.memory as f64 / 1024.0 / 1024.0).round() as u64
    }

    /// Human readable lines describing the host
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("CPU: {} Cores ({})", self.cpus, self.cpu_name),
            format!("RAM: {} GB", self.memory_gb()),
            format!("OS: {}", self.os.sysname),
        ]
    }
}

/// The JSON feed after key camel-casing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPayload {
    pub metrics: Vec<MetricSample>,
    pub frameworks: Vec<Framework>,
    pub languages: Vec<Language>,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Hardware>,
}

/// Normalized record, one per framework with complete data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub id: u64,
    pub language: Language,
    pub framework: Framework,
    pub level64: MetricMap,
    pub level256: MetricMap,
    pub level512: MetricMap,
}

impl Benchmark {
    pub fn level(&self, level: ConcurrencyLevel) -> &MetricMap {
        match level {
            ConcurrencyLevel::C64 => &self.level64,
            ConcurrencyLevel::C256 => &self.level256,
            ConcurrencyLevel::C512 => &self.level512,
        }
    }

    pub fn value(&self, level: ConcurrencyLevel, key: MetricKey) -> Option<f64> {
        self.level(level).get(&key).copied()
    }

    /// Values of one metric at every level, missing values read as zero
    pub fn values(&self, key: MetricKey) -> PerLevel<f64> {
        PerLevel::from_fn(|level| self.value(level, key).unwrap_or(0.0))
    }
}

/// Output of the normalizer for one revision
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkData {
    pub benchmarks: Vec<Benchmark>,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<Hardware>,
}

impl BenchmarkData {
    pub fn is_empty(&self) -> bool {
        self.benchmarks.is_empty()
    }

    pub fn find_by_framework(&self, label: &str) -> Option<&Benchmark> {
        self.benchmarks.iter().find(|b| b.framework.label == label)
    }
}

/// Framework cell of the legacy README table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyFramework {
    pub name: String,
    pub link: String,
    pub version: String,
}

/// One row of the legacy README table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyBenchmark {
    pub id: u64,
    pub language: String,
    pub framework: LegacyFramework,
    pub speed64: f64,
    pub speed256: f64,
    pub speed512: f64,
}

impl LegacyBenchmark {
    pub fn speeds(&self) -> PerLevel<f64> {
        PerLevel {
            level64: self.speed64,
            level256: self.speed256,
            level512: self.speed512,
        }
    }
}
