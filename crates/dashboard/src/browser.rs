//! Browser location and history bindings

use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wfb_core::HistorySink;

/// Page selected by the URL hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Results,
    Compare,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::Home, Route::Results, Route::Compare];

    /// `#/`, `#/result`, `#/compare`; anything else is home
    pub fn from_hash(hash: &str) -> Self {
        let path = hash.trim_start_matches('#').trim_matches('/');
        match path {
            "result" | "results" => Route::Results,
            "compare" => Route::Compare,
            _ => Route::Home,
        }
    }

    pub fn hash(self) -> &'static str {
        match self {
            Route::Home => "#/",
            Route::Results => "#/result",
            Route::Compare => "#/compare",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Results => "Results",
            Route::Compare => "Compare",
        }
    }
}

pub fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

pub fn current_hash() -> String {
    web_sys::window()
        .and_then(|w| w.location().hash().ok())
        .unwrap_or_default()
}

/// Calls `on_route` with the new route whenever the hash changes, which also
/// covers back/forward navigation between hash routes. The listener lives as
/// long as the page.
pub fn watch_route(mut on_route: impl FnMut(Route) + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let listener = Closure::<dyn FnMut()>::new(move || on_route(Route::from_hash(&current_hash())));

    for event in ["hashchange", "popstate"] {
        if let Err(e) =
            window.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        {
            warn!("Failed to listen for {}: {:?}", event, e);
        }
    }
    listener.forget();
}

/// `path?query#hash`, without the `?` when the query is empty
pub fn page_url(path: &str, query: &str, hash: &str) -> String {
    if query.is_empty() {
        format!("{path}{hash}")
    } else {
        format!("{path}?{query}{hash}")
    }
}

/// Replaces the current history entry; path and hash are kept
#[derive(Debug, Default)]
pub struct BrowserHistory;

impl HistorySink for BrowserHistory {
    fn replace_query(&mut self, query: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let location = window.location();
        let url = page_url(
            &location.pathname().unwrap_or_default(),
            query,
            &location.hash().unwrap_or_default(),
        );

        let result = window
            .history()
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&url)));
        match result {
            Ok(()) => debug!("URL is now {}", url),
            Err(e) => warn!("Failed to update the URL: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_hash() {
        assert_eq!(Route::from_hash(""), Route::Home);
        assert_eq!(Route::from_hash("#/"), Route::Home);
        assert_eq!(Route::from_hash("#/result"), Route::Results);
        assert_eq!(Route::from_hash("#/compare/"), Route::Compare);
        assert_eq!(Route::from_hash("#/unknown"), Route::Home);

        for route in Route::ALL {
            assert_eq!(Route::from_hash(route.hash()), route);
        }
    }

    #[test]
    fn test_route_from_history_hashes() {
        // hashes as they arrive after back/forward or a hand edit
        assert_eq!(Route::from_hash("#result"), Route::Results);
        assert_eq!(Route::from_hash("#/results/"), Route::Results);
        assert_eq!(Route::from_hash("#compare"), Route::Compare);
        assert_eq!(Route::from_hash("#"), Route::Home);
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("/", "", "#/result"), "/#/result");
        assert_eq!(page_url("/bench/", "l=Go", ""), "/bench/?l=Go");
        assert_eq!(page_url("/", "f=gin", "#/compare"), "/?f=gin#/compare");
    }
}
