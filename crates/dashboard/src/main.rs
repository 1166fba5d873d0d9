//! Dioxus-based dashboard for the web frameworks benchmark results
//!
//! A pure Rust frontend that compiles to WebAssembly.
//! 100% Rust - no manually written JS/TS/CSS.
//! All styling is inline in Rust code.
//!
//! ## Pages
//!
//! The page is picked by the URL hash (`#/`, `#/result`, `#/compare`), the
//! filter and sort state lives in the query string. Every state change goes
//! through [`StateManager`], which rewrites the query with
//! `history.replaceState`, so any view can be shared by copying the URL.

use chrono::{DateTime, Utc};
use dioxus::prelude::*;
use tracing::{debug, info, warn};
use wfb_core::color::{chip_style as chip_colors, option_style, OptionState};
use wfb_core::format::format_axis_value;
use wfb_core::view::{
    framework_options, language_options, page_size_label, paginate, project_charts, project_table,
    FilterOption, MetricChart, ALL_ROWS, PAGE_SIZES,
};
use wfb_core::{
    BenchmarkData, LoadState, LoadTracker, MetricCatalog, MetricKey, Revision, StateManager,
};

mod api;
mod browser;
mod styles;

use browser::{BrowserHistory, Route};
use styles::*;

/// Global theme context - true = dark mode
#[derive(Clone, Copy)]
struct ThemeCtx(Signal<bool>);

/// Shared view state, data and revision list
#[derive(Clone, Copy)]
struct AppCtx {
    manager: Signal<StateManager<BrowserHistory>>,
    tracker: Signal<LoadTracker<BenchmarkData>>,
    revisions: Signal<Vec<Revision>>,
}

/// Colour used for options that have none of their own
const NEUTRAL_COLOR: &str = "#57606a";

fn main() {
    tracing_wasm::set_as_global_default();
    launch(App);
}

/// Start loading `sha`. Results of loads started earlier are discarded.
fn start_load(mut tracker: Signal<LoadTracker<BenchmarkData>>, sha: String) {
    let ticket = tracker.write().begin(&sha);
    spawn(async move {
        let result = api::load_revision(&sha).await;
        if tracker.write().finish(ticket, result) {
            info!("Revision {} loaded", sha);
        } else {
            debug!("Revision {} superseded", sha);
        }
    });
}

#[component]
fn App() -> Element {
    let dark_mode = use_signal(|| false);
    use_context_provider(|| ThemeCtx(dark_mode));

    let manager = use_signal(|| {
        StateManager::load_from_url(&browser::current_search(), BrowserHistory)
    });
    let tracker = use_signal(LoadTracker::<BenchmarkData>::new);
    let mut revisions = use_signal(|| vec![Revision::latest()]);
    let mut route = use_signal(|| Route::from_hash(&browser::current_hash()));
    use_context_provider(|| AppCtx {
        manager,
        tracker,
        revisions,
    });

    use_hook(move || {
        browser::watch_route(move |next| {
            if *route.peek() != next {
                route.set(next);
            }
        });
        start_load(tracker, manager.peek().state().revision.clone());
        spawn(async move {
            match api::load_revisions().await {
                Ok(list) => revisions.set(list),
                Err(e) => warn!("Revision list unavailable: {}", e),
            }
        });
    });

    let dark = *dark_mode.read();

    let content = match tracker.read().state() {
        LoadState::Ready { data, .. } => Some(Ok(data.clone())),
        LoadState::Failed { message, .. } => Some(Err(message.clone())),
        LoadState::Idle | LoadState::Loading { .. } => None,
    };

    let body = match content {
        None => rsx! { LoadingState {} },
        Some(Err(message)) => rsx! { ErrorState { message } },
        Some(Ok(data)) if data.is_empty() => rsx! { EmptyState {} },
        Some(Ok(data)) => match route() {
            Route::Home => rsx! { Home { data } },
            Route::Results => rsx! { Results { data } },
            Route::Compare => rsx! { Compare { data } },
        },
    };

    rsx! {
        div { style: "{app_style(dark)}",
            Header { route }
            main { style: "{main_content_style(dark)}",
                {body}
            }
        }
    }
}

#[component]
fn Header(route: Signal<Route>) -> Element {
    let mut route = route;
    let ThemeCtx(mut dark_mode) = use_context::<ThemeCtx>();
    let AppCtx {
        mut manager,
        tracker,
        revisions,
    } = use_context::<AppCtx>();
    let dark = *dark_mode.read();
    let current = manager.read().state().revision.clone();
    let loading = tracker.read().is_loading();

    rsx! {
        header { style: "{header_style(dark)}",
            h1 { style: "{title_style(dark)}", "Web Frameworks Benchmark" }

            for page in Route::ALL {
                a {
                    key: "{page.title()}",
                    href: "{page.hash()}",
                    style: "{nav_link_style(dark, route() == page)}",
                    onclick: move |_| route.set(page),
                    "{page.title()}"
                }
            }

            div { style: "margin-left: auto; display: flex; gap: 0.5rem; align-items: center;",
                if loading {
                    span { style: "{muted_style(dark)}", "Loading..." }
                }
                select {
                    style: "{select_style(dark)}",
                    onchange: move |evt| {
                        let sha = evt.value();
                        manager.write().on_revision_change(&sha);
                        start_load(tracker, sha);
                    },
                    for revision in revisions.read().iter() {
                        option {
                            key: "{revision.sha}",
                            value: "{revision.sha}",
                            selected: revision.sha == current,
                            "{revision.date}"
                        }
                    }
                }
                button {
                    style: "{toggle_btn_style(dark)}",
                    onclick: move |_| {
                        let current = *dark_mode.read();
                        dark_mode.set(!current);
                    },
                    if dark { "☀ light" } else { "☾ dark" }
                }
            }
        }
    }
}

#[component]
fn LoadingState() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{loading_style(dark)}",
            "Loading..."
        }
    }
}

#[component]
fn ErrorState(message: String) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{error_style(dark)}",
            strong { "Error: " }
            "{message}"
        }
    }
}

#[component]
fn EmptyState() -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    rsx! {
        div { style: "{empty_style(dark)}",
            p { "No framework has complete results in this revision." }
        }
    }
}

/// `May 1, 2024`, or the raw value when it is not RFC 3339
fn format_updated_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc).format("%B %-d, %Y").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

#[component]
fn Home(data: BenchmarkData) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let updated = format_updated_at(&data.updated_at);
    let hardware = data
        .hardware
        .as_ref()
        .map(|h| h.summary())
        .unwrap_or_default();

    rsx! {
        h2 { style: "{page_title_style(dark)}", "Web Frameworks Benchmark" }
        p {
            "Throughput and latency of {data.benchmarks.len()} web frameworks, measured with "
            code { style: "{code_style(dark)}", "wrk" }
            " at 64, 256 and 512 concurrent connections."
        }
        p { style: "{muted_style(dark)}", "Last updated: {updated}" }

        if !hardware.is_empty() {
            div { style: "{card_style(dark)}",
                div { style: "{card_header_style(dark)}",
                    span { style: "{card_title_style(dark)}", "Hardware" }
                }
                ul { style: "margin: 0; padding: 0.75rem 2rem;",
                    for line in hardware.iter() {
                        li { key: "{line}", "{line}" }
                    }
                }
            }
        }
    }
}

/// Chips for the selected values plus a dropdown that toggles an option
#[component]
fn MultiSelect(
    placeholder: String,
    options: Vec<FilterOption>,
    selected: Vec<String>,
    on_change: EventHandler<Vec<String>>,
) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let color_of = |option: &FilterOption| {
        option
            .color
            .clone()
            .unwrap_or_else(|| NEUTRAL_COLOR.to_string())
    };

    // (value, label, style, selection without this value)
    let chips: Vec<(String, String, String, Vec<String>)> = selected
        .iter()
        .filter_map(|value| options.iter().find(|o| &o.value == value))
        .map(|chosen| {
            let remaining = selected
                .iter()
                .filter(|v| **v != chosen.value)
                .cloned()
                .collect();
            let style = chip_style(&chip_colors(&color_of(chosen)).to_css());
            (chosen.value.clone(), chosen.label.clone(), style, remaining)
        })
        .collect();

    // (value, label, style)
    let entries: Vec<(String, String, String)> = options
        .iter()
        .map(|entry| {
            let state = OptionState::resolve(false, selected.contains(&entry.value), false);
            let style = option_style(&color_of(entry), state).to_css();
            (entry.value.clone(), entry.label.clone(), style)
        })
        .collect();

    let current = selected.clone();

    rsx! {
        div { style: "min-width: 260px;",
            div {
                for (value, label, style, remaining) in chips {
                    span { key: "{value}", style: "{style}",
                        "{label}"
                        button {
                            style: "{chip_remove_style(dark)}",
                            onclick: move |_| on_change.call(remaining.clone()),
                            "×"
                        }
                    }
                }
            }
            select {
                style: "{select_style(dark)}",
                value: "",
                onchange: move |evt| {
                    let value = evt.value();
                    if value.is_empty() {
                        return;
                    }
                    let mut next = current.clone();
                    match next.iter().position(|v| *v == value) {
                        Some(pos) => {
                            next.remove(pos);
                        }
                        None => next.push(value),
                    }
                    on_change.call(next);
                },
                option { value: "", "{placeholder}" }
                for (value, label, style) in entries {
                    option { key: "{value}", value: "{value}", style: "{style}", "{label}" }
                }
            }
        }
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq)]
struct RowView {
    id: u64,
    language: String,
    framework: String,
    version: String,
    website: String,
    cells: Vec<(String, f64, String)>,
    errors: Option<String>,
}

#[component]
fn Results(data: BenchmarkData) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let AppCtx { mut manager, .. } = use_context::<AppCtx>();
    let dark = *dark_mode.read();

    let mut page = use_signal(|| 1usize);
    let mut per_page = use_signal(|| PAGE_SIZES[0]);

    let state = manager.read().state().clone();
    let catalog = MetricCatalog::standard();
    let table = project_table(&data.benchmarks, &state, &catalog);
    let current = paginate(&table.rows, page(), per_page());
    let (current_page, page_count, total) = (current.page, current.page_count, current.total);

    let rows: Vec<RowView> = current
        .items
        .iter()
        .map(|row| RowView {
            id: row.id,
            language: row.language.clone(),
            framework: row.framework.clone(),
            version: row.framework_version.clone(),
            website: row.website.clone(),
            cells: row
                .cells
                .iter()
                .map(|(level, cell)| (level.to_string(), cell.raw, cell.display.clone()))
                .collect(),
            errors: row
                .http_errors
                .as_ref()
                .map(|e| e.tooltip_lines().join("\n")),
        })
        .collect();

    let headers: Vec<(wfb_core::SortColumn, String, bool, &'static str)> = table
        .columns
        .iter()
        .map(|column| {
            let sorted = state.sort_column == column.id;
            // same column flips, a new numeric column starts with the largest values
            let ascending = if sorted {
                !state.sort_ascending
            } else {
                !column.numeric
            };
            let arrow = match (sorted, state.sort_ascending) {
                (false, _) => "",
                (true, true) => " ▲",
                (true, false) => " ▼",
            };
            (column.id, column.name.clone(), ascending, arrow)
        })
        .collect();

    rsx! {
        h2 { style: "{page_title_style(dark)}", "Results" }

        div { style: "{toolbar_style(dark)}",
            MultiSelect {
                placeholder: "Filter languages…".to_string(),
                options: language_options(&data.benchmarks),
                selected: state.language_filter.clone(),
                on_change: move |labels| {
                    manager.write().on_language_filter_change(labels);
                    page.set(1);
                }
            }
            MultiSelect {
                placeholder: "Filter frameworks…".to_string(),
                options: framework_options(&data.benchmarks),
                selected: state.framework_filter.clone(),
                on_change: move |labels| {
                    manager.write().on_framework_filter_change(labels);
                    page.set(1);
                }
            }
            select {
                style: "{select_style(dark)}",
                onchange: move |evt| {
                    if let Ok(key) = evt.value().parse::<MetricKey>() {
                        manager.write().on_metric_change(key);
                    }
                },
                for metric in catalog.metrics() {
                    option {
                        key: "{metric.key}",
                        value: "{metric.key}",
                        selected: metric.key == state.selected_metric,
                        "{metric.title}"
                    }
                }
            }
        }

        div { style: "{card_style(dark)}",
            table { style: "{table_style(dark)}",
                thead {
                    tr {
                        for (id, name, ascending, arrow) in headers {
                            th {
                                key: "{id}",
                                style: "{th_style(dark, state.sort_column == id)}",
                                onclick: move |_| manager.write().on_sort_change(id, ascending),
                                "{name}{arrow}"
                            }
                        }
                    }
                }
                tbody {
                    for row in rows {
                        tr { key: "{row.id}",
                            td { style: "{td_style(dark, false)}", "{row.language}" }
                            td { style: "{td_style(dark, false)}",
                                a {
                                    href: "{row.website}",
                                    target: "_blank",
                                    rel: "noreferrer",
                                    style: "{link_style(dark)}",
                                    "{row.framework}"
                                }
                                span { style: "{muted_style(dark)}", " ({row.version})" }
                            }
                            for (level, raw, display) in row.cells.iter() {
                                td {
                                    key: "{level}",
                                    style: "{td_style(dark, true)}",
                                    title: "{raw}",
                                    "{display}"
                                    if let Some(errors) = &row.errors {
                                        span { style: "{error_marker_style(dark)}", title: "{errors}", "⚠" }
                                    }
                                }
                            }
                        }
                    }
                }
            }

            div { style: "{pager_style(dark)}",
                span { style: "{muted_style(dark)}", "{total} frameworks" }
                select {
                    style: "{select_style(dark)}",
                    onchange: move |evt| {
                        if let Ok(size) = evt.value().parse::<usize>() {
                            per_page.set(size);
                            page.set(1);
                        }
                    },
                    for size in PAGE_SIZES.into_iter().chain([ALL_ROWS]) {
                        option {
                            key: "{size}",
                            value: "{size}",
                            selected: size == per_page(),
                            "{page_size_label(size)}"
                        }
                    }
                }
                button {
                    style: "{page_btn_style(dark, current_page <= 1)}",
                    disabled: current_page <= 1,
                    onclick: move |_| page.set(current_page.saturating_sub(1).max(1)),
                    "‹"
                }
                span { "Page {current_page} of {page_count}" }
                button {
                    style: "{page_btn_style(dark, current_page >= page_count)}",
                    disabled: current_page >= page_count,
                    onclick: move |_| page.set(current_page + 1),
                    "›"
                }
            }
        }
    }
}

#[component]
fn Compare(data: BenchmarkData) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let AppCtx { mut manager, .. } = use_context::<AppCtx>();
    let dark = *dark_mode.read();

    let state = manager.read().state().clone();
    let charts = project_charts(
        &data.benchmarks,
        &state,
        &MetricCatalog::standard(),
        false,
    );

    rsx! {
        h2 { style: "{page_title_style(dark)}", "Compare" }

        div { style: "{toolbar_style(dark)}",
            MultiSelect {
                placeholder: "Select frameworks…".to_string(),
                options: framework_options(&data.benchmarks),
                selected: state.framework_filter.clone(),
                on_change: move |labels| manager.write().on_framework_filter_change(labels)
            }
        }

        if charts.is_empty() {
            div { style: "{empty_style(dark)}",
                p { "Select one or more frameworks to compare them metric by metric." }
            }
        } else {
            for chart in charts {
                BarChart { key: "{chart.anchor}", chart }
            }
        }
    }
}

/// One bar of a grouped bar chart
struct Bar {
    key: String,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: String,
    stroke: String,
}

/// Grouped bars: one group per concurrency level, one bar per framework
#[component]
fn BarChart(chart: MetricChart) -> Element {
    let ThemeCtx(dark_mode) = use_context::<ThemeCtx>();
    let dark = *dark_mode.read();

    let chart_width = 800.0;
    let chart_height = 280.0;
    let padding = 50.0;
    let plot_width = chart_width - 2.0 * padding;
    let plot_height = chart_height - 2.0 * padding;
    let grid_c = grid_color(dark);
    let axis_c = axis_color(dark);

    let max_value = match chart.max_value() {
        v if v > 0.0 => v,
        _ => 1.0,
    };
    let group_width = plot_width / chart.labels.len().max(1) as f64;
    let bar_width = group_width * 0.8 / chart.datasets.len().max(1) as f64;

    let bars: Vec<Bar> = chart
        .datasets
        .iter()
        .enumerate()
        .flat_map(|(j, dataset)| {
            dataset.data.iter().enumerate().map(move |(i, (level, value))| {
                let height = plot_height * (value / max_value);
                Bar {
                    key: format!("{}-{}", dataset.label, level),
                    x: padding + group_width * i as f64 + group_width * 0.1 + bar_width * j as f64,
                    y: padding + plot_height - height,
                    width: bar_width,
                    height,
                    fill: dataset.background_color.clone(),
                    stroke: dataset.color.clone(),
                }
            })
        })
        .collect();

    rsx! {
        div { id: "{chart.anchor}", style: "{card_style(dark)}",
            div { style: "{card_header_style(dark)}",
                a { href: "#{chart.anchor}", style: "{card_title_style(dark)} text-decoration: none;", "{chart.title}" }
            }

            svg {
                style: "width: 100%; height: auto; max-height: 320px;",
                view_box: "0 0 {chart_width} {chart_height}",
                "preserveAspectRatio": "xMidYMid meet",

                for i in 0..5 {
                    line {
                        x1: "{padding}",
                        y1: "{padding + plot_height * (i as f64 / 4.0)}",
                        x2: "{chart_width - padding}",
                        y2: "{padding + plot_height * (i as f64 / 4.0)}",
                        stroke: "{grid_c}",
                        "stroke-width": "1"
                    }
                    text {
                        x: "{padding - 6.0}",
                        y: "{padding + plot_height * (i as f64 / 4.0) + 4.0}",
                        fill: "{axis_c}",
                        "font-size": "11",
                        "text-anchor": "end",
                        "{format_axis_value(max_value * (1.0 - i as f64 / 4.0))}"
                    }
                }

                for bar in bars {
                    rect {
                        key: "{bar.key}",
                        x: "{bar.x}",
                        y: "{bar.y}",
                        width: "{bar.width}",
                        height: "{bar.height}",
                        fill: "{bar.fill}",
                        stroke: "{bar.stroke}",
                        "stroke-width": "1"
                    }
                }

                for (i, label) in chart.labels.iter().enumerate() {
                    text {
                        key: "{label}",
                        x: "{padding + group_width * (i as f64 + 0.5)}",
                        y: "{chart_height - padding + 18.0}",
                        fill: "{axis_c}",
                        "font-size": "12",
                        "text-anchor": "middle",
                        "{label}"
                    }
                }
            }

            div { style: "{legend_style(dark)}",
                for dataset in chart.datasets.iter() {
                    div { key: "{dataset.label}", style: "display: flex; align-items: center; gap: 0.4rem;",
                        span { style: "width: 10px; height: 10px; background: {dataset.background_color}; border: 1px solid {dataset.color};" }
                        span { "{dataset.label}" }
                    }
                }
            }
        }
    }
}
