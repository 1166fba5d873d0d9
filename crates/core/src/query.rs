//! View state and its URL query string representation
//!
//! | param | meaning |
//! |---|---|
//! | `f` | framework labels, comma-delimited |
//! | `l` | language labels, comma-delimited |
//! | `metric` | selected metric key |
//! | `order_by` (`orderBy` is read too) | sort column id |
//! | `asc` | `true` / `false` |
//! | `sha` | data revision |
//!
//! Parameters holding their default value are left out of the URL.

use crate::data::{ConcurrencyLevel, MetricKey};
use crate::metrics::{MetricCatalog, DEFAULT_METRIC};
use crate::revision::DEFAULT_REVISION;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

pub const PARAM_FRAMEWORKS: &str = "f";
pub const PARAM_LANGUAGES: &str = "l";
pub const PARAM_METRIC: &str = "metric";
pub const PARAM_ORDER_BY: &str = "order_by";
pub const PARAM_ORDER_BY_LEGACY: &str = "orderBy";
pub const PARAM_ASC: &str = "asc";
pub const PARAM_SHA: &str = "sha";

/// Column the results table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortColumn {
    Language,
    Framework,
    Level(ConcurrencyLevel),
}

impl SortColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Language => "language",
            SortColumn::Framework => "framework",
            SortColumn::Level(level) => level.column_id(),
        }
    }
}

impl Default for SortColumn {
    fn default() -> Self {
        SortColumn::Level(ConcurrencyLevel::C64)
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "language" => Ok(SortColumn::Language),
            "framework" => Ok(SortColumn::Framework),
            other => ConcurrencyLevel::ALL
                .into_iter()
                .find(|l| l.column_id() == other)
                .map(SortColumn::Level)
                .ok_or_else(|| format!("unknown sort column '{}'", other)),
        }
    }
}

impl TryFrom<String> for SortColumn {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortColumn> for String {
    fn from(column: SortColumn) -> Self {
        column.as_str().to_string()
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interactive state of one dashboard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub language_filter: Vec<String>,
    pub framework_filter: Vec<String>,
    pub selected_metric: MetricKey,
    pub sort_column: SortColumn,
    pub sort_ascending: bool,
    pub revision: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            language_filter: Vec::new(),
            framework_filter: Vec::new(),
            selected_metric: DEFAULT_METRIC,
            sort_column: SortColumn::default(),
            sort_ascending: false,
            revision: DEFAULT_REVISION.to_string(),
        }
    }
}

impl ViewState {
    /// Decode a query string (with or without the leading `?`). Never fails:
    /// anything unparseable falls back to its default.
    pub fn from_query(query: &str) -> Self {
        Self::from_params(&QueryParams::parse(query))
    }

    pub fn from_params(params: &QueryParams) -> Self {
        let defaults = Self::default();
        let catalog = MetricCatalog::standard();

        let selected_metric = params
            .get(PARAM_METRIC)
            .and_then(|v| v.parse::<MetricKey>().ok())
            .filter(|k| catalog.contains(*k))
            .unwrap_or(defaults.selected_metric);

        let sort_column = [PARAM_ORDER_BY, PARAM_ORDER_BY_LEGACY]
            .into_iter()
            .filter_map(|name| params.get(name))
            .find_map(|v| v.parse::<SortColumn>().ok())
            .unwrap_or(defaults.sort_column);

        let sort_ascending = params
            .get(PARAM_ASC)
            .and_then(parse_bool)
            .unwrap_or(defaults.sort_ascending);

        let revision = params
            .get(PARAM_SHA)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or(defaults.revision);

        Self {
            language_filter: params.get_list(PARAM_LANGUAGES),
            framework_filter: params.get_list(PARAM_FRAMEWORKS),
            selected_metric,
            sort_column,
            sort_ascending,
            revision,
        }
    }

    /// Encode into a query string without the leading `?`
    pub fn to_query(&self) -> String {
        let mut params = QueryParams::default();
        self.write_frameworks(&mut params);
        self.write_languages(&mut params);
        self.write_metric(&mut params);
        self.write_sort(&mut params);
        self.write_revision(&mut params);
        params.to_string()
    }

    pub(crate) fn write_frameworks(&self, params: &mut QueryParams) {
        params.set_list(PARAM_FRAMEWORKS, &self.framework_filter);
    }

    pub(crate) fn write_languages(&self, params: &mut QueryParams) {
        params.set_list(PARAM_LANGUAGES, &self.language_filter);
    }

    pub(crate) fn write_metric(&self, params: &mut QueryParams) {
        let value = (self.selected_metric != DEFAULT_METRIC).then(|| self.selected_metric.as_str());
        params.set(PARAM_METRIC, value);
    }

    pub(crate) fn write_sort(&self, params: &mut QueryParams) {
        let column = (self.sort_column != SortColumn::default()).then(|| self.sort_column.as_str());
        params.remove(PARAM_ORDER_BY_LEGACY);
        params.set(PARAM_ORDER_BY, column);
        params.set(PARAM_ASC, self.sort_ascending.then_some("true"));
    }

    pub(crate) fn write_revision(&self, params: &mut QueryParams) {
        let sha = (self.revision != DEFAULT_REVISION).then_some(self.revision.as_str());
        params.set(PARAM_SHA, sha);
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Ordered query parameters. Parameters this crate does not know are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        Self {
            pairs: form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value of `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every value of `name`, comma-split, trimmed, empties dropped.
    /// `f=a,b` and `f=a&f=b` decode the same.
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == name)
            .flat_map(|(_, v)| v.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Replace `name` in place, or append it. `None` removes the parameter.
    pub fn set(&mut self, name: &str, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            self.remove(name);
            return;
        };

        match self.pairs.iter().position(|(k, _)| k == name) {
            Some(idx) => {
                self.pairs[idx].1 = value.to_string();
                let mut seen = 0;
                self.pairs.retain(|(k, _)| {
                    if k != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.pairs.push((name.to_string(), value.to_string())),
        }
    }

    /// Comma-join `values`; an empty list removes the parameter
    pub fn set_list(&mut self, name: &str, values: &[String]) {
        let joined = values.join(",");
        self.set(name, Some(joined.as_str()));
    }

    pub fn remove(&mut self, name: &str) {
        self.pairs.retain(|(k, _)| k != name);
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state() -> ViewState {
        ViewState {
            language_filter: vec!["Ruby".to_string(), "C++".to_string()],
            framework_filter: vec!["sinatra".to_string(), "drogon & co".to_string()],
            selected_metric: MetricKey::Percentile99,
            sort_column: SortColumn::Framework,
            sort_ascending: true,
            revision: "0a1b2c3".to_string(),
        }
    }

    #[test]
    fn test_round_trip() {
        let original = state();
        let decoded = ViewState::from_query(&original.to_query());
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_round_trip_every_column_and_metric() {
        let catalog = MetricCatalog::standard();
        let columns = [
            SortColumn::Language,
            SortColumn::Framework,
            SortColumn::Level(ConcurrencyLevel::C64),
            SortColumn::Level(ConcurrencyLevel::C256),
            SortColumn::Level(ConcurrencyLevel::C512),
        ];
        for metric in catalog.metrics() {
            for column in columns {
                for asc in [true, false] {
                    let original = ViewState {
                        selected_metric: metric.key,
                        sort_column: column,
                        sort_ascending: asc,
                        ..state()
                    };
                    assert_eq!(ViewState::from_query(&original.to_query()), original);
                }
            }
        }
    }

    #[test]
    fn test_defaults_encode_to_empty_query() {
        assert_eq!(ViewState::default().to_query(), "");
        assert_eq!(ViewState::from_query(""), ViewState::default());
    }

    #[test]
    fn test_decode_known_query() {
        let decoded =
            ViewState::from_query("?f=gin,echo&l=Go&metric=averageLatency&orderBy=level512&asc=true");

        assert_eq!(decoded.framework_filter, vec!["gin", "echo"]);
        assert_eq!(decoded.language_filter, vec!["Go"]);
        assert_eq!(decoded.selected_metric, MetricKey::AverageLatency);
        assert_eq!(decoded.sort_column, SortColumn::Level(ConcurrencyLevel::C512));
        assert!(decoded.sort_ascending);
        assert_eq!(decoded.revision, "master");
    }

    #[test]
    fn test_decode_garbage_falls_back() {
        for garbage in [
            "metric=bogus&asc=maybe&order_by=price&sha=",
            "%%%&&&===",
            "?&=&f&l=,,,",
            "metric=durationMs",
            "\u{1F600}=\u{1F600}",
        ] {
            let decoded = ViewState::from_query(garbage);
            assert_eq!(decoded.selected_metric, DEFAULT_METRIC, "{garbage}");
            assert_eq!(decoded.sort_column, SortColumn::default(), "{garbage}");
            assert!(!decoded.sort_ascending, "{garbage}");
            assert_eq!(decoded.revision, DEFAULT_REVISION, "{garbage}");
            assert!(decoded.framework_filter.is_empty(), "{garbage}");
            assert!(decoded.language_filter.is_empty(), "{garbage}");
        }
    }

    #[test]
    fn test_repeated_list_params() {
        let decoded = ViewState::from_query("f=gin&f=echo,fiber");
        assert_eq!(decoded.framework_filter, vec!["gin", "echo", "fiber"]);
    }

    #[test]
    fn test_order_by_preferred_over_legacy() {
        let decoded = ViewState::from_query("orderBy=language&order_by=framework");
        assert_eq!(decoded.sort_column, SortColumn::Framework);

        let decoded = ViewState::from_query("order_by=nope&orderBy=language");
        assert_eq!(decoded.sort_column, SortColumn::Language);
    }

    #[test]
    fn test_query_params_set_keeps_position_and_unknowns() {
        let mut params = QueryParams::parse("utm=x&f=a&f=b&page=2");
        params.set("f", Some("c"));
        assert_eq!(params.to_string(), "utm=x&f=c&page=2");

        params.set("f", None);
        params.set("metric", Some("percentile50"));
        assert_eq!(params.to_string(), "utm=x&page=2&metric=percentile50");

        params.set_list("l", &[]);
        assert_eq!(params.get("l"), None);
    }
}
