//! wfb-core - Shared types and logic for the web framework benchmark dashboard
//!
//! This crate contains WASM-compatible code that can be shared between
//! the CLI and the dashboard.
//!
//! # Features
//!
//! - Normalize the JSON results feed and parse the legacy markdown table
//! - Catalog of comparable metrics with their formatters
//! - Stable per-framework colours and selector styles
//! - Filter/sort state kept in step with the URL query string
//! - Table and chart projections of the normalized records

pub mod color;
pub mod data;
pub mod error;
pub mod format;
pub mod metrics;
pub mod parser;
pub mod query;
pub mod revision;
pub mod state;
pub mod view;

pub use color::{appearance, option_style, Appearance, OptionState, OptionStyle};
pub use data::{
    Benchmark, BenchmarkData, ConcurrencyLevel, Framework, Hardware, Language, LegacyBenchmark,
    MetricKey, PerLevel,
};
pub use error::{Error, Result};
pub use metrics::{ComparedMetric, MetricCatalog, DEFAULT_METRIC};
pub use parser::{
    normalize_json, parse_from_file, parse_markdown, parse_payload, NormalizeOptions, Payload,
};
pub use query::{QueryParams, SortColumn, ViewState};
pub use revision::{LoadState, LoadTracker, Revision, DEFAULT_REVISION};
pub use state::{HistorySink, MemoryHistory, StateManager};
pub use view::{
    filter_benchmarks, paginate, project_charts, project_table, MetricChart, TableProjection,
    PAGE_SIZES,
};
