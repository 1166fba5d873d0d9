//! Text, markdown and JSON renderers for the projections

use clap::ValueEnum;
use serde::Serialize;
use wfb_core::format::{format_axis_value, format_thousands};
use wfb_core::view::{MetricChart, Page, TableProjection, TableRow};
use wfb_core::{BenchmarkData, LegacyBenchmark, Revision};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Table,
    Markdown,
    Json,
}

/// Column-aligned text table
fn aligned(header: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(header);
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

fn markdown(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = format!("| {} |\n", header.join(" | "));
    out.push_str(&format!("|{}\n", "---|".repeat(header.len())));
    for row in rows {
        out.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    out
}

fn grid(format: Format, header: &[String], rows: &[Vec<String>]) -> String {
    match format {
        Format::Markdown => markdown(header, rows),
        _ => aligned(header, rows),
    }
}

fn json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}

fn row_cells(row: &TableRow) -> Vec<String> {
    let mut cells = vec![
        row.language.clone(),
        format!("{} ({})", row.framework, row.framework_version),
    ];
    for (_, cell) in row.cells.iter() {
        if row.http_errors.is_some() {
            cells.push(format!("{} *", cell.display));
        } else {
            cells.push(cell.display.clone());
        }
    }
    cells
}

/// Results table for one page of rows
pub fn render_table(
    table: &TableProjection,
    page: &Page<'_, TableRow>,
    format: Format,
) -> serde_json::Result<String> {
    if format == Format::Json {
        return json(&serde_json::json!({
            "columns": table.columns,
            "rows": page.items,
            "page": page.page,
            "pageCount": page.page_count,
            "total": page.total,
        }));
    }

    let header: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    let rows: Vec<Vec<String>> = page.items.iter().map(row_cells).collect();
    let mut out = grid(format, &header, &rows);

    let errors: Vec<String> = page
        .items
        .iter()
        .filter_map(|row| {
            let lines = row.http_errors.as_ref()?.tooltip_lines();
            Some(format!("* {}: {}", row.framework, lines.join(" ")))
        })
        .collect();
    if !errors.is_empty() {
        out.push('\n');
        for line in errors {
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "\nPage {} of {} ({} frameworks)\n",
        page.page, page.page_count, page.total
    ));
    Ok(out)
}

/// One section per comparison chart
pub fn render_charts(charts: &[MetricChart], format: Format) -> serde_json::Result<String> {
    if format == Format::Json {
        return json(charts);
    }

    let mut out = String::new();
    for chart in charts {
        match format {
            Format::Markdown => out.push_str(&format!("### {}\n\n", chart.title)),
            _ => out.push_str(&format!("{} [#{}]\n", chart.title, chart.anchor)),
        }

        let mut header = vec!["Framework".to_string()];
        header.extend(chart.labels.iter().cloned());
        let rows: Vec<Vec<String>> = chart
            .datasets
            .iter()
            .map(|dataset| {
                let mut row = vec![dataset.label.clone()];
                row.extend(dataset.data.iter().map(|(_, v)| format_axis_value(*v)));
                row
            })
            .collect();

        out.push_str(&grid(format, &header, &rows));
        out.push('\n');
    }
    Ok(out)
}

/// Legacy README table
pub fn render_legacy(rows: &[LegacyBenchmark], format: Format) -> serde_json::Result<String> {
    if format == Format::Json {
        return json(rows);
    }

    let header: Vec<String> = ["Language", "Framework", "Speed (64)", "Speed (256)", "Speed (512)"]
        .into_iter()
        .map(String::from)
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.language.clone(),
                format!("{} ({})", row.framework.name, row.framework.version),
            ];
            cells.extend(row.speeds().iter().map(|(_, v)| format_thousands(*v)));
            cells
        })
        .collect();

    Ok(grid(format, &header, &cells))
}

pub fn render_revisions(revisions: &[Revision], format: Format) -> serde_json::Result<String> {
    if format == Format::Json {
        return json(revisions);
    }

    let header = vec!["Revision".to_string(), "Date".to_string()];
    let rows: Vec<Vec<String>> = revisions
        .iter()
        .map(|r| vec![r.sha.clone(), r.date.clone()])
        .collect();
    Ok(grid(format, &header, &rows))
}

/// Update date and benchmark host
pub fn render_info(data: &BenchmarkData, updated: &str, format: Format) -> serde_json::Result<String> {
    if format == Format::Json {
        return json(&serde_json::json!({
            "updatedAt": data.updated_at,
            "frameworks": data.benchmarks.len(),
            "hardware": data.hardware,
        }));
    }

    let mut out = format!("Last updated: {}\n", updated);
    out.push_str(&format!("Frameworks: {}\n", data.benchmarks.len()));
    if let Some(hardware) = &data.hardware {
        for line in hardware.summary() {
            out.push_str(&line);
            out.push('\n');
        }
    }
    Ok(out)
}
