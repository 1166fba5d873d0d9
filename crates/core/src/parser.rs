//! Normalizer for the benchmark feeds
//!
//! JSON feed (`data.min.json`), keys arrive in snake_case:
//! ```text
//! { "metrics": [{ "level": 64, "label": "totalRequestsPerS", "value": 1.0, "framework_id": 1 }],
//!   "frameworks": [...], "languages": [...], "updated_at": "...", "hardware": {...} }
//! ```
//!
//! Legacy README feed, one pipe-delimited table:
//! ```text
//! | 1 | go (1.21) | [gin](https://gin-gonic.com) (1.9) | 123,456 | 130,000 | 128,000 |
//! ```

use crate::data::{
    Benchmark, BenchmarkData, ConcurrencyLevel, Language, LegacyBenchmark, LegacyFramework,
    MetricKey, MetricMap, RawPayload,
};
use crate::error::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Options for the JSON normalizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Decimal places every metric value is rounded to
    pub precision: u32,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self { precision: 5 }
    }
}

/// A parsed payload of either feed
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(BenchmarkData),
    Legacy(Vec<LegacyBenchmark>),
}

/// Parse a payload, picking the feed by its first non-blank character
pub fn parse_payload(raw: &str, options: &NormalizeOptions) -> Result<Payload> {
    if raw.trim_start().starts_with('{') {
        normalize_json(raw, options).map(Payload::Json)
    } else {
        parse_markdown(raw).map(Payload::Legacy)
    }
}

/// Parse a payload from a file
pub fn parse_from_file(path: &std::path::Path, options: &NormalizeOptions) -> Result<Payload> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_payload(&content, options)
}

/// Convert `snake_case` (or `kebab-case`) to `camelCase`. Already camel-cased input is unchanged.
pub fn camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;

    for c in s.chars() {
        if c == '_' || c == '-' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Rename every object key to camelCase, recursively. Values are untouched.
pub fn camelize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (camel_case(&k), camelize_keys(v)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(camelize_keys).collect()),
        other => other,
    }
}

/// Values that would overflow when scaled are returned as they are
fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !factor.is_finite() || !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Normalize the JSON feed into one [`Benchmark`] per framework with complete data
pub fn normalize_json(raw: &str, options: &NormalizeOptions) -> Result<BenchmarkData> {
    let value: Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(Error::Shape("top-level value must be an object".to_string()));
    }

    let payload: RawPayload = serde_json::from_value(camelize_keys(value))?;
    Ok(normalize(payload, options))
}

/// Normalize an already decoded payload
pub fn normalize(payload: RawPayload, options: &NormalizeOptions) -> BenchmarkData {
    let mut observed: BTreeSet<MetricKey> = BTreeSet::new();
    // completeness is judged on every label, including ones outside MetricKey
    let mut observed_labels: BTreeSet<&str> = BTreeSet::new();
    let mut seen_labels: HashMap<(u64, ConcurrencyLevel), HashSet<&str>> = HashMap::new();
    let mut grouped: HashMap<(u64, ConcurrencyLevel), MetricMap> = HashMap::new();

    for sample in &payload.metrics {
        let Some(level) = ConcurrencyLevel::from_value(sample.level) else {
            debug!("Ignoring sample at unsupported level {}", sample.level);
            continue;
        };
        observed_labels.insert(sample.label.as_str());
        seen_labels
            .entry((sample.framework_id, level))
            .or_default()
            .insert(sample.label.as_str());

        let key = match sample.label.parse::<MetricKey>() {
            Ok(key) => key,
            Err(_) => {
                debug!("Not keeping unknown metric '{}'", sample.label);
                continue;
            }
        };

        observed.insert(key);
        grouped
            .entry((sample.framework_id, level))
            .or_default()
            .insert(key, round_to(sample.value, options.precision));
    }

    let languages: HashMap<&str, &Language> = payload
        .languages
        .iter()
        .map(|l| (l.label.as_str(), l))
        .collect();

    let mut benchmarks = Vec::new();

    for framework in &payload.frameworks {
        let levels = ConcurrencyLevel::ALL.map(|level| grouped.remove(&(framework.id, level)));

        let complete = !observed.is_empty()
            && ConcurrencyLevel::ALL.iter().all(|level| {
                seen_labels
                    .get(&(framework.id, *level))
                    .is_some_and(|seen| observed_labels.iter().all(|l| seen.contains(l)))
            });
        if !complete {
            debug!(
                "Dropping {} (id {}): incomplete metrics",
                framework.label, framework.id
            );
            continue;
        }

        let Some(language) = languages.get(framework.language.as_str()) else {
            warn!(
                "Dropping {}: language '{}' is not in the languages list",
                framework.label, framework.language
            );
            continue;
        };

        let [level64, level256, level512] = levels.map(Option::unwrap_or_default);

        benchmarks.push(Benchmark {
            id: framework.id,
            language: (*language).clone(),
            framework: framework.clone(),
            level64,
            level256,
            level512,
        });
    }

    debug!(
        "Normalized {} of {} frameworks",
        benchmarks.len(),
        payload.frameworks.len()
    );

    BenchmarkData {
        benchmarks,
        updated_at: payload.updated_at,
        hardware: payload.hardware,
    }
}

/// Parser for the legacy README table
pub struct MarkdownParser {
    /// `[name](link) (version)`
    framework_regex: Regex,
}

impl MarkdownParser {
    pub fn new() -> Result<Self> {
        let framework_regex = Regex::new(r"\[(.*?)\]\((.*?)\) \((.*?)\)")?;
        Ok(Self { framework_regex })
    }

    /// Parse the first table of a markdown document, rows sorted by language
    pub fn parse(&self, md: &str) -> Result<Vec<LegacyBenchmark>> {
        let (Some(start), Some(end)) = (md.find('|'), md.rfind('|')) else {
            return Err(Error::Markdown {
                row: 0,
                reason: "no table found".to_string(),
            });
        };

        let mut results = Vec::new();

        // Header and separator rows are skipped
        for (idx, row) in md[start..=end].lines().enumerate().skip(2) {
            let row = row.trim();
            if row.is_empty() {
                continue;
            }
            results.push(self.parse_row(idx, row)?);
        }

        results.sort_by(|a, b| a.language.to_lowercase().cmp(&b.language.to_lowercase()));
        Ok(results)
    }

    fn parse_row(&self, idx: usize, row: &str) -> Result<LegacyBenchmark> {
        let err = |reason: String| Error::Markdown { row: idx, reason };

        let inner = row.strip_prefix('|').unwrap_or(row);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        let cells: Vec<&str> = inner.split('|').map(str::trim).collect();

        let [id, language, framework, speed64, speed256, speed512] = cells[..] else {
            return Err(err(format!("expected 6 cells, found {}", cells.len())));
        };

        let captures = self
            .framework_regex
            .captures(framework)
            .ok_or_else(|| err(format!("cannot parse framework cell '{}'", framework)))?;

        let speed = |cell: &str| {
            to_number(cell).ok_or_else(|| err(format!("cannot parse speed '{}'", cell)))
        };

        Ok(LegacyBenchmark {
            id: id
                .parse()
                .map_err(|_| err(format!("invalid id '{}'", id)))?,
            language: language.to_string(),
            framework: LegacyFramework {
                name: captures[1].to_string(),
                link: captures[2].to_string(),
                version: captures[3].to_string(),
            },
            speed64: speed(speed64)?,
            speed256: speed(speed256)?,
            speed512: speed(speed512)?,
        })
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new().expect("Failed to create parser - regex compilation failed")
    }
}

/// Keep only digits and dots; an empty remainder reads as zero
fn to_number(cell: &str) -> Option<f64> {
    let digits: String = cell
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if digits.is_empty() {
        return Some(0.0);
    }
    digits.parse().ok()
}

/// Parse the legacy README table
pub fn parse_markdown(md: &str) -> Result<Vec<LegacyBenchmark>> {
    MarkdownParser::new()?.parse(md)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Version;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample(framework_id: u64, level: u32, label: &str, value: f64) -> Value {
        json!({ "framework_id": framework_id, "level": level, "label": label, "value": value })
    }

    fn full_samples(framework_id: u64, rps: f64) -> Vec<Value> {
        [64, 256, 512]
            .iter()
            .flat_map(|&level| {
                vec![
                    sample(framework_id, level, "totalRequestsPerS", rps),
                    sample(framework_id, level, "averageLatency", 1234.5),
                ]
            })
            .collect()
    }

    fn payload(metrics: Vec<Value>) -> String {
        json!({
            "metrics": metrics,
            "frameworks": [
                { "id": 1, "label": "gin", "version": "1.9", "language": "Go", "website": "https://gin-gonic.com" },
                { "id": 2, "label": "sinatra", "version": 4, "language": "Ruby", "website": "https://sinatrarb.com" },
                { "id": 3, "label": "orphan", "version": "0.1", "language": "Cobol", "website": "" }
            ],
            "languages": [
                { "label": "Go", "version": "1.21" },
                { "label": "Ruby", "version": "3.2" }
            ],
            "updated_at": "2024-05-01T00:00:00Z",
            "hardware": { "cpus": 8, "cpu_name": "Xeon", "memory": 16777216, "os": { "sysname": "Linux" } }
        })
        .to_string()
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("framework_id"), "frameworkId");
        assert_eq!(camel_case("updated_at"), "updatedAt");
        assert_eq!(camel_case("totalRequestsPerS"), "totalRequestsPerS");
        assert_eq!(camel_case("_private"), "private");
    }

    #[test]
    fn test_camelize_keys_is_recursive() {
        let value = json!({ "cpu_name": "x", "os_info": { "sys_name": "Linux" }, "list": [{ "a_b": "c_d" }] });
        assert_eq!(
            camelize_keys(value),
            json!({ "cpuName": "x", "osInfo": { "sysName": "Linux" }, "list": [{ "aB": "c_d" }] })
        );
    }

    #[test]
    fn test_normalize_complete_frameworks() {
        let mut metrics = full_samples(1, 1000.123456789);
        metrics.extend(full_samples(2, 500.0));

        let data = normalize_json(&payload(metrics), &NormalizeOptions::default()).unwrap();

        assert_eq!(data.benchmarks.len(), 2);
        assert_eq!(data.updated_at, "2024-05-01T00:00:00Z");
        assert_eq!(data.hardware.as_ref().unwrap().cpu_name, "Xeon");

        let gin = &data.benchmarks[0];
        assert_eq!(gin.framework.label, "gin");
        assert_eq!(gin.language.version, Version::Text("1.21".to_string()));
        assert_eq!(
            gin.value(ConcurrencyLevel::C64, MetricKey::TotalRequestsPerS),
            Some(1000.12346)
        );

        for b in &data.benchmarks {
            let keys64: Vec<_> = b.level64.keys().collect();
            assert!(!keys64.is_empty());
            assert_eq!(keys64, b.level256.keys().collect::<Vec<_>>());
            assert_eq!(keys64, b.level512.keys().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_normalize_excludes_partial_frameworks() {
        let mut metrics = full_samples(1, 1000.0);
        // sinatra lacks averageLatency at 512
        metrics.extend(full_samples(2, 500.0).into_iter().filter(|s| {
            !(s["level"] == 512 && s["label"] == "averageLatency")
        }));

        let data = normalize_json(&payload(metrics), &NormalizeOptions::default()).unwrap();

        let labels: Vec<_> = data.benchmarks.iter().map(|b| b.framework.label.as_str()).collect();
        assert_eq!(labels, vec!["gin"]);
    }

    #[test]
    fn test_normalize_drops_unmatched_language() {
        let mut metrics = full_samples(1, 1000.0);
        metrics.extend(full_samples(3, 10.0));

        let data = normalize_json(&payload(metrics), &NormalizeOptions::default()).unwrap();

        assert!(data.find_by_framework("orphan").is_none());
        assert!(data.find_by_framework("gin").is_some());
    }

    #[test]
    fn test_normalize_precision() {
        let metrics = full_samples(1, 1000.16);
        let options = NormalizeOptions { precision: 1 };

        let data = normalize_json(&payload(metrics), &options).unwrap();

        assert_eq!(
            data.benchmarks[0].value(ConcurrencyLevel::C512, MetricKey::TotalRequestsPerS),
            Some(1000.2)
        );
    }

    #[test]
    fn test_normalize_out_of_range_precision_keeps_values() {
        let metrics = full_samples(1, 1000.0);

        for precision in [308, 400, u32::MAX] {
            let data = normalize_json(&payload(metrics.clone()), &NormalizeOptions { precision })
                .unwrap();
            assert_eq!(
                data.benchmarks[0].value(ConcurrencyLevel::C64, MetricKey::AverageLatency),
                Some(1234.5),
                "precision {precision}"
            );
        }
    }

    #[test]
    fn test_round_to_overflow() {
        assert_eq!(round_to(1.25e300, 10), 1.25e300);
        assert_eq!(round_to(2.346, 2), 2.35);
        assert_eq!(round_to(7.0, 0), 7.0);
    }

    #[test]
    fn test_normalize_unknown_label_counts_for_completeness() {
        let mut metrics = full_samples(1, 1000.0);
        metrics.extend(full_samples(2, 500.0));
        for level in [64, 256, 512] {
            metrics.push(sample(1, level, "foo", 1.0));
        }

        let data = normalize_json(&payload(metrics), &NormalizeOptions::default()).unwrap();

        let labels: Vec<_> = data.benchmarks.iter().map(|b| b.framework.label.as_str()).collect();
        assert_eq!(labels, vec!["gin"]);
        // the label itself is not kept
        assert_eq!(data.benchmarks[0].level64.len(), 2);
    }

    #[test]
    fn test_normalize_ignores_other_levels() {
        let mut metrics = full_samples(1, 1000.0);
        metrics.push(sample(1, 1024, "totalRequestsPerS", 1.0));

        let data = normalize_json(&payload(metrics), &NormalizeOptions::default()).unwrap();
        assert_eq!(data.benchmarks.len(), 1);
    }

    #[test]
    fn test_normalize_missing_field_fails_fast() {
        let raw = json!({ "metrics": [], "frameworks": [], "updated_at": "x" }).to_string();
        let err = normalize_json(&raw, &NormalizeOptions::default()).unwrap_err();
        assert!(err.to_string().contains("languages"));
    }

    #[test]
    fn test_normalize_rejects_non_object() {
        let err = normalize_json("[1, 2]", &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
    }

    #[test]
    fn test_normalize_without_metrics_is_empty() {
        let data = normalize_json(&payload(vec![]), &NormalizeOptions::default()).unwrap();
        assert!(data.is_empty());
    }

    const README: &str = r#"
# Results

| Language | Framework | Speed (64) | Speed (256) | Speed (512) |
|----|----|----|----|----|
| 2 | ruby (3.2) | [sinatra](https://sinatrarb.com) (4.0) | 12,345.10 | 13,000 | 12,900 |
| 1 | go (1.21) | [gin](https://gin-gonic.com) (1.9) | 120,000 | 130,000 | 128,000 |

Generated at 2024-05-01
"#;

    #[test]
    fn test_parse_markdown() {
        let rows = parse_markdown(README).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].language, "go (1.21)");
        assert_eq!(
            rows[0].framework,
            LegacyFramework {
                name: "gin".to_string(),
                link: "https://gin-gonic.com".to_string(),
                version: "1.9".to_string(),
            }
        );
        assert_eq!(rows[0].speed256, 130000.0);
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[1].speed64, 12345.1);
    }

    #[test]
    fn test_parse_markdown_without_table() {
        assert!(parse_markdown("no table here").is_err());
    }

    #[test]
    fn test_parse_markdown_bad_framework_cell() {
        let md = "| a | b |\n|---|---|\n| 1 | go | gin | 1 | 2 | 3 |";
        let err = parse_markdown(md).unwrap_err();
        assert!(matches!(err, Error::Markdown { row: 2, .. }));
    }

    #[test]
    fn test_parse_payload_detects_feed() {
        let options = NormalizeOptions::default();
        assert!(matches!(
            parse_payload(README, &options).unwrap(),
            Payload::Legacy(_)
        ));
        assert!(matches!(
            parse_payload(&payload(full_samples(1, 1.0)), &options).unwrap(),
            Payload::Json(_)
        ));
    }
}
