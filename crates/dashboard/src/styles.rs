//! Minimalistic styles - no external CSS files
//!
//! Clean, practical design with light/dark theme support. Framework colours
//! come from `wfb_core::color`, everything else lives here.

// ============================================================================
// Theme-aware style generators
// ============================================================================

/// Generate app style based on theme
pub fn app_style(dark: bool) -> String {
    let (bg, fg) = if dark {
        ("#0d1117", "#c9d1d9")
    } else {
        ("#ffffff", "#1a1a1a")
    };
    format!(
        "min-height: 100vh; \
         display: flex; \
         flex-direction: column; \
         font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif; \
         font-size: 14px; \
         background: {bg}; \
         color: {fg}; \
         line-height: 1.5; \
         margin: 0; \
         padding: 0;"
    )
}

/// Generate header style
pub fn header_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#161b22", "#30363d")
    } else {
        ("#f6f8fa", "#d0d7de")
    };
    format!(
        "display: flex; \
         gap: 1rem; \
         align-items: center; \
         padding: 0.75rem 1rem; \
         background: {bg}; \
         border-bottom: 1px solid {border};"
    )
}

pub fn title_style(_dark: bool) -> &'static str {
    "font-size: 1.1rem; \
     font-weight: 600; \
     margin: 0 1rem 0 0;"
}

/// Navigation link, underlined when active
pub fn nav_link_style(dark: bool, active: bool) -> String {
    let fg = match (dark, active) {
        (true, true) => "#58a6ff",
        (false, true) => "#0969da",
        (true, false) => "#c9d1d9",
        (false, false) => "#1a1a1a",
    };
    let border = if active { fg } else { "transparent" };
    format!(
        "color: {fg}; \
         text-decoration: none; \
         padding: 0.25rem 0; \
         border-bottom: 2px solid {border};"
    )
}

/// Generate theme toggle button style
pub fn toggle_btn_style(dark: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#21262d", "#c9d1d9", "#30363d")
    } else {
        ("#f6f8fa", "#1a1a1a", "#d0d7de")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.35rem 0.75rem; \
         font-family: inherit; \
         font-size: 0.8rem; \
         border-radius: 6px; \
         cursor: pointer;"
    )
}

/// Dropdowns
pub fn select_style(dark: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#0d1117", "#c9d1d9", "#30363d")
    } else {
        ("#ffffff", "#1a1a1a", "#d0d7de")
    };
    format!(
        "padding: 0.35rem 0.5rem; \
         background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         border-radius: 6px; \
         font-family: inherit; \
         font-size: 0.85rem;"
    )
}

/// Main content area style
pub fn main_content_style(dark: bool) -> String {
    let bg = if dark { "#0d1117" } else { "#ffffff" };
    format!(
        "flex: 1; \
         padding: 1.5rem 2rem; \
         overflow-y: auto; \
         background: {bg};"
    )
}

pub fn page_title_style(dark: bool) -> String {
    let fg = if dark { "#c9d1d9" } else { "#1a1a1a" };
    format!(
        "font-size: 1.5rem; \
         font-weight: 600; \
         color: {fg}; \
         margin: 0 0 1rem 0;"
    )
}

/// Card wrapping a chart or the results table
pub fn card_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#161b22", "#30363d")
    } else {
        ("#ffffff", "#d0d7de")
    };
    format!(
        "background: {bg}; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         margin-bottom: 1.5rem; \
         overflow: hidden;"
    )
}

pub fn card_header_style(dark: bool) -> String {
    let (bg, border) = if dark {
        ("#21262d", "#30363d")
    } else {
        ("#f6f8fa", "#d0d7de")
    };
    format!(
        "display: flex; \
         justify-content: space-between; \
         align-items: center; \
         padding: 0.75rem 1rem; \
         background: {bg}; \
         border-bottom: 1px solid {border};"
    )
}

pub fn card_title_style(dark: bool) -> String {
    let fg = if dark { "#c9d1d9" } else { "#1a1a1a" };
    format!(
        "font-size: 1rem; \
         font-weight: 600; \
         color: {fg};"
    )
}

/// Row of filter controls above the table
pub fn toolbar_style(_dark: bool) -> &'static str {
    "display: flex; \
     flex-wrap: wrap; \
     gap: 1rem; \
     align-items: flex-start; \
     margin-bottom: 1rem;"
}

pub fn table_style(_dark: bool) -> &'static str {
    "width: 100%; \
     border-collapse: collapse; \
     font-size: 0.85rem;"
}

/// Sortable header cell
pub fn th_style(dark: bool, sorted: bool) -> String {
    let (fg, border) = if dark {
        (if sorted { "#58a6ff" } else { "#8b949e" }, "#30363d")
    } else {
        (if sorted { "#0969da" } else { "#57606a" }, "#d0d7de")
    };
    format!(
        "text-align: left; \
         padding: 0.5rem 0.75rem; \
         color: {fg}; \
         font-weight: 600; \
         border-bottom: 1px solid {border}; \
         cursor: pointer; \
         user-select: none; \
         white-space: nowrap;"
    )
}

pub fn td_style(dark: bool, numeric: bool) -> String {
    let border = if dark { "#21262d" } else { "#eaeef2" };
    let align = if numeric { "right" } else { "left" };
    format!(
        "padding: 0.45rem 0.75rem; \
         text-align: {align}; \
         border-bottom: 1px solid {border}; \
         font-variant-numeric: tabular-nums;"
    )
}

/// Marker on cells of frameworks that saw HTTP errors
pub fn error_marker_style(dark: bool) -> String {
    let fg = if dark { "#f85149" } else { "#cf222e" };
    format!(
        "color: {fg}; \
         margin-left: 0.3rem; \
         cursor: help;"
    )
}

pub fn link_style(dark: bool) -> String {
    let fg = if dark { "#58a6ff" } else { "#0969da" };
    format!(
        "color: {fg}; \
         text-decoration: none; \
         font-weight: 500;"
    )
}

/// Selected value in a multi-select
pub fn chip_style(color_css: &str) -> String {
    format!(
        "{color_css} \
         display: inline-flex; \
         align-items: center; \
         gap: 0.3rem; \
         padding: 0.1rem 0.5rem; \
         margin: 0 0.3rem 0.3rem 0; \
         border-radius: 4px; \
         font-size: 0.8rem;"
    )
}

pub fn chip_remove_style(_dark: bool) -> &'static str {
    "background: none; \
     border: none; \
     color: inherit; \
     cursor: pointer; \
     padding: 0; \
     font-size: 0.9rem;"
}

pub fn pager_style(_dark: bool) -> &'static str {
    "display: flex; \
     gap: 0.5rem; \
     align-items: center; \
     justify-content: flex-end; \
     padding: 0.75rem 1rem;"
}

pub fn page_btn_style(dark: bool, disabled: bool) -> String {
    let (bg, fg, border) = if dark {
        ("#21262d", "#c9d1d9", "#30363d")
    } else {
        ("#f6f8fa", "#1a1a1a", "#d0d7de")
    };
    let cursor = if disabled { "not-allowed" } else { "pointer" };
    let opacity = if disabled { "0.5" } else { "1" };
    format!(
        "background: {bg}; \
         color: {fg}; \
         border: 1px solid {border}; \
         padding: 0.25rem 0.6rem; \
         border-radius: 6px; \
         cursor: {cursor}; \
         opacity: {opacity};"
    )
}

pub fn legend_style(_dark: bool) -> &'static str {
    "display: flex; \
     flex-wrap: wrap; \
     gap: 1rem; \
     padding: 0.5rem 1rem 0.75rem; \
     font-size: 0.8rem;"
}

/// Generate muted text style
pub fn muted_style(dark: bool) -> String {
    let fg = if dark { "#8b949e" } else { "#6e7681" };
    format!("color: {fg};")
}

/// Generate loading style
pub fn loading_style(_dark: bool) -> &'static str {
    "padding: 2rem; \
     text-align: center;"
}

/// Generate error style
pub fn error_style(dark: bool) -> String {
    let border = if dark { "#f85149" } else { "#cf222e" };
    format!(
        "padding: 1rem; \
         border: 1px solid {border}; \
         border-radius: 8px; \
         margin: 1rem 0;"
    )
}

/// Generate empty state style
pub fn empty_style(_dark: bool) -> &'static str {
    "padding: 2rem; \
     text-align: center; \
     opacity: 0.7;"
}

/// Generate code/mono style
pub fn code_style(dark: bool) -> String {
    let (bg, fg) = if dark {
        ("#21262d", "#79c0ff")
    } else {
        ("#f6f8fa", "#0550ae")
    };
    format!(
        "background: {bg}; \
         color: {fg}; \
         padding: 0.2rem 0.5rem; \
         border-radius: 4px; \
         font-size: 0.85rem; \
         font-family: 'SF Mono', 'Fira Code', monospace;"
    )
}

/// SVG grid line color
pub fn grid_color(dark: bool) -> &'static str {
    if dark { "#21262d" } else { "#eaeef2" }
}

/// SVG axis label color
pub fn axis_color(dark: bool) -> &'static str {
    if dark { "#8b949e" } else { "#6e7681" }
}
