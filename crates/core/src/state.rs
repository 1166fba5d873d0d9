//! Filter/sort state kept in step with the URL
//!
//! The manager owns the [`ViewState`] and the current query parameters. Every
//! change updates the state first, then rewrites only the parameters it owns
//! and hands the new query string to a [`HistorySink`]. Nothing here reads
//! the browser location; the front end passes the initial query in.

use crate::data::MetricKey;
use crate::metrics::MetricCatalog;
use crate::query::{QueryParams, SortColumn, ViewState};
use tracing::{debug, warn};

/// Receives the re-encoded query string after each change.
/// Implementations replace the current history entry rather than navigating.
pub trait HistorySink {
    fn replace_query(&mut self, query: &str);
}

/// Keeps every written query, newest last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHistory {
    pub entries: Vec<String>,
}

impl MemoryHistory {
    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}

impl HistorySink for MemoryHistory {
    fn replace_query(&mut self, query: &str) {
        self.entries.push(query.to_string());
    }
}

/// Single source of truth for the interactive state
#[derive(Debug)]
pub struct StateManager<H> {
    state: ViewState,
    params: QueryParams,
    catalog: MetricCatalog,
    history: H,
}

impl<H: HistorySink> StateManager<H> {
    /// Decode the initial query string. Never fails.
    pub fn load_from_url(query: &str, history: H) -> Self {
        let params = QueryParams::parse(query);
        let state = ViewState::from_params(&params);
        debug!("Loaded view state from URL: {:?}", state);

        Self {
            state,
            params,
            catalog: MetricCatalog::standard(),
            history,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Current query string without the leading `?`
    pub fn query(&self) -> String {
        self.params.to_string()
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn into_history(self) -> H {
        self.history
    }

    pub fn on_language_filter_change(&mut self, labels: Vec<String>) {
        self.state.language_filter = labels;
        self.state.write_languages(&mut self.params);
        self.sync();
    }

    pub fn on_framework_filter_change(&mut self, labels: Vec<String>) {
        self.state.framework_filter = labels;
        self.state.write_frameworks(&mut self.params);
        self.sync();
    }

    /// Metrics outside the catalog are not selectable and are ignored
    pub fn on_metric_change(&mut self, key: MetricKey) {
        if !self.catalog.contains(key) {
            warn!("Ignoring selection of uncatalogued metric {}", key);
            return;
        }
        self.state.selected_metric = key;
        self.state.write_metric(&mut self.params);
        self.sync();
    }

    pub fn on_sort_change(&mut self, column: SortColumn, ascending: bool) {
        self.state.sort_column = column;
        self.state.sort_ascending = ascending;
        self.state.write_sort(&mut self.params);
        self.sync();
    }

    pub fn on_revision_change(&mut self, revision: &str) {
        let revision = revision.trim();
        if revision.is_empty() {
            return;
        }
        self.state.revision = revision.to_string();
        self.state.write_revision(&mut self.params);
        self.sync();
    }

    fn sync(&mut self) {
        let query = self.params.to_string();
        debug!("Replacing URL query with '{}'", query);
        self.history.replace_query(&query);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ConcurrencyLevel;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_load_from_url() {
        let manager = StateManager::load_from_url("l=Go&metric=percentile90", MemoryHistory::default());

        assert_eq!(manager.state().language_filter, labels(&["Go"]));
        assert_eq!(manager.state().selected_metric, MetricKey::Percentile90);
        assert!(manager.history().entries.is_empty());
    }

    #[test]
    fn test_changes_sync_to_history() {
        let mut manager = StateManager::load_from_url("", MemoryHistory::default());

        manager.on_framework_filter_change(labels(&["gin", "echo"]));
        assert_eq!(manager.history().current(), Some("f=gin%2Cecho"));

        manager.on_language_filter_change(labels(&["Ruby"]));
        assert_eq!(manager.history().current(), Some("f=gin%2Cecho&l=Ruby"));

        manager.on_metric_change(MetricKey::AverageLatency);
        manager.on_sort_change(SortColumn::Level(ConcurrencyLevel::C256), true);
        assert_eq!(
            manager.history().current(),
            Some("f=gin%2Cecho&l=Ruby&metric=averageLatency&order_by=level256&asc=true")
        );

        assert_eq!(manager.history().entries.len(), 4);
        assert_eq!(
            ViewState::from_query(&manager.query()),
            manager.state().clone()
        );
    }

    #[test]
    fn test_clearing_removes_params() {
        let mut manager = StateManager::load_from_url(
            "f=gin&metric=percentile99&asc=true&order_by=language",
            MemoryHistory::default(),
        );

        manager.on_framework_filter_change(Vec::new());
        manager.on_metric_change(MetricKey::TotalRequestsPerS);
        manager.on_sort_change(SortColumn::default(), false);

        assert_eq!(manager.history().current(), Some(""));
    }

    #[test]
    fn test_unrelated_params_survive() {
        let mut manager =
            StateManager::load_from_url("?ref=share&orderBy=framework", MemoryHistory::default());
        assert_eq!(manager.state().sort_column, SortColumn::Framework);

        manager.on_sort_change(SortColumn::Language, true);
        assert_eq!(
            manager.history().current(),
            Some("ref=share&order_by=language&asc=true")
        );
    }

    #[test]
    fn test_uncatalogued_metric_is_ignored() {
        let mut manager = StateManager::load_from_url("", MemoryHistory::default());
        manager.on_metric_change(MetricKey::DurationMs);

        assert_eq!(manager.state().selected_metric, MetricKey::TotalRequestsPerS);
        assert!(manager.history().entries.is_empty());
    }

    #[test]
    fn test_revision_change() {
        let mut manager = StateManager::load_from_url("f=gin", MemoryHistory::default());

        manager.on_revision_change("0a1b2c3");
        assert_eq!(manager.history().current(), Some("f=gin&sha=0a1b2c3"));

        manager.on_revision_change("master");
        assert_eq!(manager.history().current(), Some("f=gin"));

        manager.on_revision_change("  ");
        assert_eq!(manager.history().entries.len(), 2);
    }
}
