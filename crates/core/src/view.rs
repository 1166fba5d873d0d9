//! Projection of normalized records into table rows, chart series and filter options

use crate::color::appearance;
use crate::data::{Benchmark, ConcurrencyLevel, MetricKey, PerLevel};
use crate::format::to_milliseconds;
use crate::metrics::{ComparedMetric, MetricCatalog};
use crate::query::{SortColumn, ViewState};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Page sizes offered by the results table
pub const PAGE_SIZES: [usize; 3] = [25, 50, 100];

/// Page size meaning "every row"
pub const ALL_ROWS: usize = 0;

/// "25 / page", or "All" for [`ALL_ROWS`]
pub fn page_size_label(per_page: usize) -> String {
    if per_page == ALL_ROWS {
        "All".to_string()
    } else {
        format!("{} / page", per_page)
    }
}

/// Records passing the language/framework filters.
///
/// A record passes when its language is selected *or* its framework is
/// selected; with both filters empty every record passes.
pub fn filter_benchmarks<'a>(benchmarks: &'a [Benchmark], state: &ViewState) -> Vec<&'a Benchmark> {
    if state.language_filter.is_empty() && state.framework_filter.is_empty() {
        return benchmarks.iter().collect();
    }

    let languages: HashSet<&str> = state.language_filter.iter().map(String::as_str).collect();
    let frameworks: HashSet<&str> = state.framework_filter.iter().map(String::as_str).collect();

    benchmarks
        .iter()
        .filter(|b| {
            languages.contains(b.language.label.as_str())
                || frameworks.contains(b.framework.label.as_str())
        })
        .collect()
}

fn compare_by(a: &Benchmark, b: &Benchmark, column: SortColumn, metric: MetricKey) -> Ordering {
    match column {
        SortColumn::Language => a
            .language
            .display_name()
            .to_lowercase()
            .cmp(&b.language.display_name().to_lowercase()),
        SortColumn::Framework => a
            .framework
            .label
            .to_lowercase()
            .cmp(&b.framework.label.to_lowercase()),
        SortColumn::Level(level) => {
            let va = a.value(level, metric).unwrap_or(f64::NEG_INFINITY);
            let vb = b.value(level, metric).unwrap_or(f64::NEG_INFINITY);
            va.total_cmp(&vb)
        }
    }
}

/// Stable sort on the raw (unrounded) values; ties keep their input order in both directions
pub fn sort_benchmarks(rows: &mut [&Benchmark], column: SortColumn, metric: MetricKey, ascending: bool) {
    rows.sort_by(|a, b| {
        let ord = compare_by(a, b, column, metric);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    });
}

/// Table column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: SortColumn,
    pub name: String,
    pub numeric: bool,
}

/// One rendered metric value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Value used for sorting
    pub raw: f64,
    /// Rounded and formatted value
    pub display: String,
}

/// Per-level HTTP error counts, present only when some level saw errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpErrors(pub PerLevel<f64>);

impl HttpErrors {
    pub fn from_benchmark(benchmark: &Benchmark) -> Option<Self> {
        let errors = benchmark.values(MetricKey::HttpErrors);
        let any = errors.iter().any(|(_, v)| *v > 0.0);
        any.then_some(Self(errors))
    }

    /// "HTTP Errors:" followed by one line per level with errors
    pub fn tooltip_lines(&self) -> Vec<String> {
        let mut lines = vec!["HTTP Errors:".to_string()];
        lines.extend(
            self.0
                .iter()
                .filter(|(_, v)| **v > 0.0)
                .map(|(level, v)| format!("{}: {}", level, v)),
        );
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub id: u64,
    pub language: String,
    pub language_label: String,
    pub framework: String,
    pub framework_version: String,
    pub website: String,
    pub cells: PerLevel<Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_errors: Option<HttpErrors>,
}

impl TableRow {
    fn new(benchmark: &Benchmark, metric: &ComparedMetric) -> Self {
        Self {
            id: benchmark.id,
            language: benchmark.language.display_name(),
            language_label: benchmark.language.label.clone(),
            framework: benchmark.framework.label.clone(),
            framework_version: benchmark.framework.version.to_string(),
            website: benchmark.framework.website.clone(),
            cells: PerLevel::from_fn(|level| {
                let raw = benchmark.value(level, metric.key).unwrap_or(0.0);
                Cell {
                    raw,
                    display: metric.display(raw),
                }
            }),
            http_errors: HttpErrors::from_benchmark(benchmark),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProjection {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

/// Columns for `metric`: language, framework, then one per concurrency level
pub fn table_columns(metric: &ComparedMetric) -> Vec<Column> {
    let mut columns = vec![
        Column {
            id: SortColumn::Language,
            name: "Language".to_string(),
            numeric: false,
        },
        Column {
            id: SortColumn::Framework,
            name: "Framework".to_string(),
            numeric: false,
        },
    ];
    columns.extend(ConcurrencyLevel::ALL.map(|level| Column {
        id: SortColumn::Level(level),
        name: format!("{} ({})", metric.title, level),
        numeric: true,
    }));
    columns
}

/// Filtered, sorted results table for the selected metric
pub fn project_table(
    benchmarks: &[Benchmark],
    state: &ViewState,
    catalog: &MetricCatalog,
) -> TableProjection {
    let metric = catalog.lookup_or_default(state.selected_metric);

    let mut rows = filter_benchmarks(benchmarks, state);
    sort_benchmarks(&mut rows, state.sort_column, metric.key, state.sort_ascending);

    TableProjection {
        columns: table_columns(metric),
        rows: rows.into_iter().map(|b| TableRow::new(b, metric)).collect(),
    }
}

/// One bar group series per framework
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub color: String,
    pub background_color: String,
    pub data: PerLevel<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChart {
    pub key: MetricKey,
    /// Fragment id for deep links, `#percentile99`
    pub anchor: String,
    pub title: String,
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

impl MetricChart {
    pub fn max_value(&self) -> f64 {
        self.datasets
            .iter()
            .flat_map(|d| d.data.iter().map(|(_, v)| *v))
            .fold(0.0, f64::max)
    }
}

/// Selected frameworks in selection order; unknown labels are dropped
pub fn selected_frameworks<'a>(benchmarks: &'a [Benchmark], labels: &[String]) -> Vec<&'a Benchmark> {
    labels
        .iter()
        .filter_map(|label| benchmarks.iter().find(|b| &b.framework.label == label))
        .collect()
}

/// Chart for one metric; latency values are converted from µs to ms
pub fn project_chart(selected: &[&Benchmark], metric: &ComparedMetric, compact: bool) -> MetricChart {
    let labels = ConcurrencyLevel::ALL
        .iter()
        .map(|level| {
            if compact {
                level.to_string()
            } else {
                format!("Concurrency {}", level)
            }
        })
        .collect();

    let datasets = selected
        .iter()
        .map(|b| {
            let look = appearance(b);
            let values = b.values(metric.key);
            ChartDataset {
                label: look.label,
                color: look.color,
                background_color: look.background_color,
                data: if metric.is_latency() {
                    values.map(|v| to_milliseconds(*v))
                } else {
                    values
                },
            }
        })
        .collect();

    MetricChart {
        key: metric.key,
        anchor: metric.key.as_str().to_string(),
        title: metric.heading().to_string(),
        labels,
        datasets,
    }
}

/// Comparison charts, one per catalog metric, for the frameworks in the framework filter
pub fn project_charts(
    benchmarks: &[Benchmark],
    state: &ViewState,
    catalog: &MetricCatalog,
    compact: bool,
) -> Vec<MetricChart> {
    let selected = selected_frameworks(benchmarks, &state.framework_filter);
    if selected.is_empty() {
        return Vec::new();
    }

    catalog
        .metrics()
        .iter()
        .map(|metric| project_chart(&selected, metric, compact))
        .collect()
}

/// Entry of a filter dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterOption {
    /// Value written to the URL
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One option per distinct language label, first occurrence wins
pub fn language_options(benchmarks: &[Benchmark]) -> Vec<FilterOption> {
    let mut seen = HashSet::new();
    benchmarks
        .iter()
        .filter(|b| seen.insert(b.language.label.as_str()))
        .map(|b| FilterOption {
            value: b.language.label.clone(),
            label: b.language.display_name(),
            color: None,
        })
        .collect()
}

/// One option per framework: "Go - gin (1.9)"
pub fn framework_options(benchmarks: &[Benchmark]) -> Vec<FilterOption> {
    benchmarks
        .iter()
        .map(|b| FilterOption {
            value: b.framework.label.clone(),
            label: format!("{} - {}", b.language.label, b.framework.display_name()),
            color: Some(appearance(b).color),
        })
        .collect()
}

/// A slice of rows for one table page
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// `page` is 1-based and clamped into range; `per_page == 0` shows everything
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let total = items.len();
    let per_page = if per_page == 0 { total.max(1) } else { per_page };
    let page_count = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, page_count);

    let start = ((page - 1) * per_page).min(total);
    let end = (start + per_page).min(total);

    Page {
        items: &items[start..end],
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Framework, Language, MetricMap, Version};
    use pretty_assertions::assert_eq;

    fn bench(id: u64, lang: &str, fw: &str, rps: [f64; 3], errors: [f64; 3]) -> Benchmark {
        let level = |i: usize| -> MetricMap {
            [
                (MetricKey::TotalRequestsPerS, rps[i]),
                (MetricKey::AverageLatency, rps[i] * 10.0),
                (MetricKey::HttpErrors, errors[i]),
            ]
            .into_iter()
            .collect()
        };
        Benchmark {
            id,
            language: Language {
                label: lang.to_string(),
                version: Version::Text("1.0".to_string()),
            },
            framework: Framework {
                id,
                label: fw.to_string(),
                version: Version::Number(2.0),
                language: lang.to_string(),
                website: format!("https://{}.example", fw),
            },
            level64: level(0),
            level256: level(1),
            level512: level(2),
        }
    }

    fn fixtures() -> Vec<Benchmark> {
        vec![
            bench(1, "Ruby", "Sinatra", [100.0, 90.0, 80.0], [0.0, 0.0, 0.0]),
            bench(2, "Go", "Gin", [1000.0, 1200.0, 1100.0], [0.0, 3.0, 0.0]),
            bench(3, "Go", "Echo", [900.0, 1200.0, 1000.0], [0.0, 0.0, 0.0]),
        ]
    }

    fn names(rows: &[&Benchmark]) -> Vec<String> {
        rows.iter().map(|b| b.framework.label.clone()).collect()
    }

    #[test]
    fn test_filter_is_union() {
        let data = fixtures();
        let state = ViewState {
            language_filter: vec!["Ruby".to_string()],
            framework_filter: vec!["Echo".to_string()],
            ..Default::default()
        };

        assert_eq!(names(&filter_benchmarks(&data, &state)), vec!["Sinatra", "Echo"]);
    }

    #[test]
    fn test_empty_filters_pass_everything() {
        let data = fixtures();
        assert_eq!(filter_benchmarks(&data, &ViewState::default()).len(), 3);
    }

    #[test]
    fn test_single_filter() {
        let data = fixtures();
        let state = ViewState {
            language_filter: vec!["Go".to_string()],
            ..Default::default()
        };
        assert_eq!(names(&filter_benchmarks(&data, &state)), vec!["Gin", "Echo"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let data = fixtures();
        let level = SortColumn::Level(ConcurrencyLevel::C256);

        let mut rows: Vec<&Benchmark> = data.iter().collect();
        sort_benchmarks(&mut rows, level, MetricKey::TotalRequestsPerS, false);
        assert_eq!(names(&rows), vec!["Gin", "Echo", "Sinatra"]);

        let mut rows: Vec<&Benchmark> = data.iter().collect();
        sort_benchmarks(&mut rows, level, MetricKey::TotalRequestsPerS, true);
        assert_eq!(names(&rows), vec!["Sinatra", "Gin", "Echo"]);
    }

    #[test]
    fn test_sort_by_text_columns() {
        let data = fixtures();
        let mut rows: Vec<&Benchmark> = data.iter().collect();

        sort_benchmarks(&mut rows, SortColumn::Framework, MetricKey::TotalRequestsPerS, true);
        assert_eq!(names(&rows), vec!["Echo", "Gin", "Sinatra"]);

        sort_benchmarks(&mut rows, SortColumn::Language, MetricKey::TotalRequestsPerS, false);
        assert_eq!(names(&rows), vec!["Sinatra", "Echo", "Gin"]);
    }

    #[test]
    fn test_project_table_rounds_display_only() {
        let mut data = fixtures();
        data[0].level64.insert(MetricKey::TotalRequestsPerS, 1234.7);
        data[1].level64.insert(MetricKey::TotalRequestsPerS, 1234.6);

        let state = ViewState {
            sort_ascending: true,
            ..Default::default()
        };
        let table = project_table(&data, &state, &MetricCatalog::standard());

        let first = &table.rows[2];
        assert_eq!(first.framework, "Sinatra");
        assert_eq!(first.cells.level64.display, "1 235");
        assert_eq!(first.cells.level64.raw, 1234.7);
        // 1234.6 and 1234.7 render the same but still sort apart
        assert_eq!(table.rows[1].framework, "Gin");
        assert_eq!(table.rows[1].cells.level64.display, "1 235");
    }

    #[test]
    fn test_table_columns() {
        let catalog = MetricCatalog::standard();
        let metric = catalog.lookup(MetricKey::Percentile50).unwrap();
        let names: Vec<String> = table_columns(metric).into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![
                "Language",
                "Framework",
                "P50 Latency (64)",
                "P50 Latency (256)",
                "P50 Latency (512)"
            ]
        );
    }

    #[test]
    fn test_http_error_annotation() {
        let data = fixtures();
        let table = project_table(&data, &ViewState::default(), &MetricCatalog::standard());

        let gin = table.rows.iter().find(|r| r.framework == "Gin").unwrap();
        let errors = gin.http_errors.as_ref().unwrap();
        assert_eq!(errors.0.level256, 3.0);
        assert_eq!(errors.tooltip_lines(), vec!["HTTP Errors:", "256: 3"]);

        let sinatra = table.rows.iter().find(|r| r.framework == "Sinatra").unwrap();
        assert!(sinatra.http_errors.is_none());
    }

    #[test]
    fn test_http_errors_from_benchmark() {
        let data = fixtures();

        let errors = HttpErrors::from_benchmark(&data[1]).unwrap();
        assert_eq!(errors.0.level64, 0.0);
        assert_eq!(errors.0.level256, 3.0);
        assert!(HttpErrors::from_benchmark(&data[0]).is_none());
    }

    #[test]
    fn test_project_charts_converts_latency() {
        let data = fixtures();
        let state = ViewState {
            framework_filter: vec!["Echo".to_string(), "missing".to_string(), "Gin".to_string()],
            ..Default::default()
        };

        let charts = project_charts(&data, &state, &MetricCatalog::standard(), false);
        assert_eq!(charts.len(), MetricCatalog::standard().metrics().len());

        let latency = charts
            .iter()
            .find(|c| c.key == MetricKey::AverageLatency)
            .unwrap();
        assert_eq!(latency.anchor, "averageLatency");
        assert_eq!(latency.labels[0], "Concurrency 64");
        let labels: Vec<&str> = latency.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Echo (2)", "Gin (2)"]);
        assert_eq!(latency.datasets[0].data.level64, 9.0);

        let rps = charts
            .iter()
            .find(|c| c.key == MetricKey::TotalRequestsPerS)
            .unwrap();
        assert_eq!(rps.datasets[1].data.level256, 1200.0);
        assert_eq!(rps.max_value(), 1200.0);
    }

    #[test]
    fn test_project_charts_without_selection() {
        let data = fixtures();
        assert!(project_charts(&data, &ViewState::default(), &MetricCatalog::standard(), true).is_empty());
    }

    #[test]
    fn test_filter_options() {
        let data = fixtures();

        let languages = language_options(&data);
        let values: Vec<&str> = languages.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["Ruby", "Go"]);
        assert_eq!(languages[1].label, "Go (1.0)");

        let frameworks = framework_options(&data);
        assert_eq!(frameworks.len(), 3);
        assert_eq!(frameworks[1].label, "Go - Gin (2)");
        assert!(frameworks[1].color.as_deref().unwrap().starts_with('#'));
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..60).collect();

        let page = paginate(&items, 3, 25);
        assert_eq!(page.items, &items[50..60]);
        assert_eq!(page.page_count, 3);

        let clamped = paginate(&items, 9, 25);
        assert_eq!(clamped.page, 3);

        let all = paginate(&items, 1, 0);
        assert_eq!(all.items.len(), 60);

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 0, 25);
        assert_eq!((page.page, page.page_count, page.items.len()), (1, 1, 0));
    }

    #[test]
    fn test_all_rows_page_size() {
        let items: Vec<u32> = (0..130).collect();

        let all = paginate(&items, 2, ALL_ROWS);
        assert_eq!((all.page, all.page_count, all.items.len()), (1, 1, 130));

        assert_eq!(page_size_label(ALL_ROWS), "All");
        assert_eq!(page_size_label(50), "50 / page");
    }
}
