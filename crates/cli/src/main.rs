//! wfb CLI - Browse the web frameworks benchmark results

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

mod client;
mod error;
mod render;

use client::{Endpoints, FeedClient};
use render::Format;
use wfb_core::view::{paginate, project_charts, project_table, ALL_ROWS, PAGE_SIZES};
use wfb_core::{
    parse_from_file, BenchmarkData, LegacyBenchmark, MemoryHistory, MetricCatalog, MetricKey,
    NormalizeOptions, Payload, SortColumn, StateManager,
};

/// wfb: Browse the web frameworks benchmark results
#[derive(Parser, Debug)]
#[command(name = "wfb")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct Config {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(
        long,
        global = true,
        env = "WFB_DATA_HOST",
        default_value = "https://raw.githubusercontent.com/the-benchmarker/web-frameworks"
    )]
    data_host: String,

    #[arg(
        long,
        global = true,
        env = "WFB_HISTORY_HOST",
        default_value = "https://api.github.com/repos/the-benchmarker/web-frameworks"
    )]
    history_host: String,

    #[arg(
        long,
        global = true,
        env = "WFB_README_HOST",
        default_value = "https://raw.githubusercontent.com/the-benchmarker/web-frameworks"
    )]
    readme_host: String,

    /// Decimal places metric values are rounded to
    #[arg(
        long,
        global = true,
        env = "WFB_PRECISION",
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(0..=15)
    )]
    precision: u32,

    #[arg(long, global = true, env = "WFB_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,
}

impl Config {
    fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            precision: self.precision,
        }
    }

    fn client(&self) -> Result<FeedClient> {
        let endpoints = Endpoints {
            data_host: self.data_host.clone(),
            history_host: self.history_host.clone(),
            readme_host: self.readme_host.clone(),
        };
        Ok(FeedClient::new(
            endpoints,
            Duration::from_secs(self.timeout_secs),
            self.github_token.clone(),
        )?)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the results table
    Results(ResultsArgs),
    /// Compare frameworks metric by metric
    Compare(CompareArgs),
    /// List the available data revisions
    Revisions(RevisionsArgs),
    /// Show when and where the benchmark ran
    Info(InfoArgs),
    /// Show the legacy README speed table
    Legacy(LegacyArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Read the payload from a file instead of downloading it
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Data revision, a commit sha or `master`
    #[arg(long)]
    sha: Option<String>,
}

#[derive(Args, Debug)]
struct ResultsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Shared query string to start from, e.g. `l=Go&metric=percentile99`
    #[arg(short, long)]
    query: Option<String>,

    #[arg(short, long, value_delimiter = ',')]
    language: Vec<String>,

    #[arg(short, long, value_delimiter = ',')]
    framework: Vec<String>,

    #[arg(short, long)]
    metric: Option<MetricKey>,

    /// `language`, `framework`, `level64`, `level256` or `level512`
    #[arg(long)]
    order_by: Option<SortColumn>,

    #[arg(long)]
    asc: Option<bool>,

    #[arg(long, default_value = "1")]
    page: usize,

    /// 25, 50 or 100; 0 shows every row
    #[arg(long, default_value = "25", value_parser = parse_page_size)]
    per_page: usize,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,
}

#[derive(Args, Debug)]
struct CompareArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(short, long)]
    query: Option<String>,

    #[arg(short, long, value_delimiter = ',')]
    framework: Vec<String>,

    /// Bare concurrency labels
    #[arg(long)]
    compact: bool,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,
}

#[derive(Args, Debug)]
struct RevisionsArgs {
    #[arg(short, long, default_value = "10")]
    limit: usize,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,
}

#[derive(Args, Debug)]
struct InfoArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,
}

#[derive(Args, Debug)]
struct LegacyArgs {
    #[command(flatten)]
    source: SourceArgs,

    #[arg(long, value_enum, default_value = "table")]
    format: Format,
}

fn parse_page_size(value: &str) -> std::result::Result<usize, String> {
    let size: usize = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if size == ALL_ROWS || PAGE_SIZES.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {:?} or 0", PAGE_SIZES))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.config.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Results(args) => {
            let (output, query) = run_results(&cli.config, &args)?;
            print!("{}", output);
            if args.format != Format::Json {
                println!("\nQuery: ?{}", query);
            }
            Ok(())
        }
        Commands::Compare(args) => {
            print!("{}", run_compare(&cli.config, &args)?);
            Ok(())
        }
        Commands::Revisions(args) => revisions_command(&cli.config, &args),
        Commands::Info(args) => {
            print!("{}", run_info(&cli.config, &args)?);
            Ok(())
        }
        Commands::Legacy(args) => {
            print!("{}", run_legacy(&cli.config, &args)?);
            Ok(())
        }
    }
}

/// State manager seeded from a shared query, with `--sha` applied on top
fn session(query: Option<&str>, sha: Option<&str>) -> StateManager<MemoryHistory> {
    let mut manager = StateManager::load_from_url(query.unwrap_or(""), MemoryHistory::default());
    if let Some(sha) = sha {
        manager.on_revision_change(sha);
    }
    manager
}

fn load_data(config: &Config, input: Option<&Path>, revision: &str) -> Result<BenchmarkData> {
    match input {
        Some(path) => {
            info!("Reading results from {:?}", path);
            match parse_from_file(path, &config.normalize_options())
                .with_context(|| format!("Failed to load results from {:?}", path))?
            {
                Payload::Json(data) => Ok(data),
                Payload::Legacy(_) => Err(error::Error::Feed {
                    expected: "JSON",
                    found: "markdown",
                }
                .into()),
            }
        }
        None => config
            .client()?
            .fetch_data(revision, &config.normalize_options())
            .with_context(|| format!("Failed to load results for revision {}", revision)),
    }
}

fn run_results(config: &Config, args: &ResultsArgs) -> Result<(String, String)> {
    let mut manager = session(args.query.as_deref(), args.source.sha.as_deref());
    let data = load_data(config, args.source.input.as_deref(), &manager.state().revision)?;

    if !args.language.is_empty() {
        manager.on_language_filter_change(args.language.clone());
    }
    if !args.framework.is_empty() {
        manager.on_framework_filter_change(args.framework.clone());
    }
    if let Some(metric) = args.metric {
        manager.on_metric_change(metric);
    }
    if args.order_by.is_some() || args.asc.is_some() {
        let column = args.order_by.unwrap_or(manager.state().sort_column);
        let ascending = args.asc.unwrap_or(manager.state().sort_ascending);
        manager.on_sort_change(column, ascending);
    }
    debug!("Rendering results for {:?}", manager.state());

    let table = project_table(&data.benchmarks, manager.state(), &MetricCatalog::standard());
    let page = paginate(&table.rows, args.page, args.per_page);
    let output = render::render_table(&table, &page, args.format)?;

    Ok((output, manager.query()))
}

fn run_compare(config: &Config, args: &CompareArgs) -> Result<String> {
    let mut manager = session(args.query.as_deref(), args.source.sha.as_deref());
    let data = load_data(config, args.source.input.as_deref(), &manager.state().revision)?;

    if !args.framework.is_empty() {
        manager.on_framework_filter_change(args.framework.clone());
    }
    if manager.state().framework_filter.is_empty() {
        anyhow::bail!("Select at least one framework with --framework");
    }

    let charts = project_charts(
        &data.benchmarks,
        manager.state(),
        &MetricCatalog::standard(),
        args.compact,
    );
    if charts.is_empty() {
        anyhow::bail!(
            "None of the selected frameworks are in revision {}",
            manager.state().revision
        );
    }

    Ok(render::render_charts(&charts, args.format)?)
}

fn revisions_command(config: &Config, args: &RevisionsArgs) -> Result<()> {
    let revisions = config
        .client()?
        .fetch_revisions(args.limit)
        .with_context(|| "Failed to load revisions")?;

    print!("{}", render::render_revisions(&revisions, args.format)?);
    Ok(())
}

/// `2024-05-01 00:00 UTC`, or the raw value when it is not RFC 3339
fn format_updated_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc).format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn run_info(config: &Config, args: &InfoArgs) -> Result<String> {
    let manager = session(None, args.source.sha.as_deref());
    let data = load_data(config, args.source.input.as_deref(), &manager.state().revision)?;

    let updated = format_updated_at(&data.updated_at);
    Ok(render::render_info(&data, &updated, args.format)?)
}

fn run_legacy(config: &Config, args: &LegacyArgs) -> Result<String> {
    let sha = args
        .source
        .sha
        .as_deref()
        .unwrap_or(wfb_core::DEFAULT_REVISION);

    let rows: Vec<LegacyBenchmark> = match &args.source.input {
        Some(path) => match parse_from_file(path, &config.normalize_options())
            .with_context(|| format!("Failed to load results from {:?}", path))?
        {
            Payload::Legacy(rows) => rows,
            Payload::Json(_) => {
                return Err(error::Error::Feed {
                    expected: "markdown",
                    found: "JSON",
                }
                .into())
            }
        },
        None => config
            .client()?
            .fetch_readme(sha)
            .with_context(|| format!("Failed to load the README table for {}", sha))?,
    };

    info!("Parsed {} legacy rows", rows.len());
    Ok(render::render_legacy(&rows, args.format)?)
}
