//! CLI parsing and orchestration. Resolves settings, runs robots check -> extract -> write,
//! and maps setup errors to exit codes. Scrape-time failures are logged and never fatal.

use crate::config::{self, Config};
use crate::formats::{write_records, OutputFormat, WriteOutcome};
use crate::model::BookRecord;
use crate::scraper::listing::DEFAULT_LISTING_TIMEOUT;
use crate::scraper::robots::{self, DEFAULT_ROBOTS_TIMEOUT};
use crate::scraper::{validate_url, Fetch, ListingExtractor, ScraperError};
use crate::PoliteClient;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Goodreads "popular by date" listing.
pub const DEFAULT_URL: &str = "https://www.goodreads.com/book/popular_by_date";
const DEFAULT_MAX_RECORDS: usize = 20;

/// CLI error carrying exit code and message.
#[derive(Debug, Error)]
pub enum CliRunError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Scraper(#[from] ScraperError),
}

impl CliRunError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliRunError::InvalidInput(_) => 1,
            CliRunError::Scraper(_) => 2,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bookscrape")]
#[command(about = "Scrape a book listing page and write the books to CSV")]
#[command(
    after_help = "Config file keys (url, max_records, output_dir, format, user_agent, robots_timeout_secs, listing_timeout_secs, pause_secs, [selectors]) are documented in the README. CLI flags override config."
)]
pub struct Args {
    /// Listing page URL. Default: Goodreads popular-by-date.
    pub url: Option<String>,

    /// Maximum number of books to take from the page (default 20).
    #[arg(short = 'n', long)]
    pub max: Option<usize>,

    /// Output path. Default: ./books_data_{YYYYMMDD}.{ext} where ext depends on --format.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: csv, tsv, or json.
    #[arg(long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// HTTP User-Agent (overrides config).
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Listing page timeout in seconds (overrides config; default 10).
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Courtesy pause in seconds after scraping (overrides config; default 2).
    #[arg(long)]
    pub delay: Option<u64>,

    /// Do not fetch robots.txt before scraping.
    #[arg(long)]
    pub skip_robots: bool,

    /// Only log warnings and errors.
    #[arg(short, long)]
    pub quiet: bool,

    /// Log debug detail and print the error chain on failure.
    #[arg(long)]
    pub verbose: bool,
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "csv" => Ok(OutputFormat::Csv),
        "tsv" | "tab" => Ok(OutputFormat::Tsv),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!(
            "Invalid --format value: '{}'. Use csv, tsv, or json.",
            s
        )),
    }
}

/// Default output file name, stamped with the run date.
fn default_output_name(format: OutputFormat, date: NaiveDate) -> String {
    format!("books_data_{}.{}", date.format("%Y%m%d"), format.extension())
}

/// Everything a scrape needs, resolved from flags, config, and defaults.
#[derive(Debug)]
pub struct RunPlan {
    pub url: String,
    pub max_records: usize,
    pub output: PathBuf,
    pub format: OutputFormat,
    /// None skips the robots.txt check.
    pub robots_timeout: Option<Duration>,
    pub extractor: ListingExtractor,
}

/// What a run did. Write failures show up as `saved == false` with records present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub allowed: bool,
    pub records: usize,
    pub saved: bool,
}

impl RunPlan {
    /// Merge CLI flags over config over built-in defaults. `today` names the default output file.
    pub fn resolve(args: &Args, config: Option<&Config>, today: NaiveDate) -> Result<Self, CliRunError> {
        let url = args
            .url
            .clone()
            .or_else(|| config.and_then(|c| c.url.clone()))
            .unwrap_or_else(|| DEFAULT_URL.to_string());
        validate_url(&url).map_err(|e| match e {
            ScraperError::InvalidUrl { input, reason } => CliRunError::InvalidInput(format!(
                "Expected a listing page URL, e.g. {}. Invalid: {}: {}",
                DEFAULT_URL, input, reason
            )),
            other => CliRunError::Scraper(other),
        })?;

        let format = match args.format {
            Some(f) => f,
            None => match config.and_then(|c| c.format.as_deref()) {
                Some(s) => parse_format(s).map_err(|e| {
                    CliRunError::InvalidInput(format!("Invalid config format: {}", e))
                })?,
                None => OutputFormat::default(),
            },
        };

        let max_records = args
            .max
            .or_else(|| config.and_then(|c| c.max_records))
            .unwrap_or(DEFAULT_MAX_RECORDS);

        let output = match &args.output {
            Some(p) => p.clone(),
            None => {
                let dir = config
                    .and_then(|c| c.output_dir.clone())
                    .unwrap_or_else(|| PathBuf::from("."));
                dir.join(default_output_name(format, today))
            }
        };

        let robots_timeout = if args.skip_robots {
            None
        } else {
            Some(
                config
                    .and_then(|c| c.robots_timeout_secs)
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_ROBOTS_TIMEOUT),
            )
        };

        let listing_timeout = args
            .timeout
            .or_else(|| config.and_then(|c| c.listing_timeout_secs))
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LISTING_TIMEOUT);
        let selectors = config
            .and_then(|c| c.selectors.clone())
            .unwrap_or_default()
            .compile()?;
        let extractor = ListingExtractor::new(selectors).with_timeout(listing_timeout);

        Ok(Self {
            url,
            max_records,
            output,
            format,
            robots_timeout,
            extractor,
        })
    }
}

/// Run the three stages against `fetcher`. Never fails; every stage logs its own problems.
pub fn scrape(fetcher: &mut dyn Fetch, plan: &RunPlan) -> RunSummary {
    if let Some(timeout) = plan.robots_timeout {
        if !robots::check(fetcher, &plan.url, timeout) {
            tracing::error!("Scraping blocked by robots.txt. Exiting.");
            return RunSummary {
                allowed: false,
                records: 0,
                saved: false,
            };
        }
    }

    let records: Vec<BookRecord> = plan.extractor.extract(fetcher, &plan.url, plan.max_records);
    let saved = matches!(
        write_records(&records, &plan.output, plan.format),
        Ok(WriteOutcome::Written { .. })
    );
    RunSummary {
        allowed: true,
        records: records.len(),
        saved,
    }
}

/// HTTP client with the pause and User-Agent from flags or config; the client's own defaults otherwise.
fn build_client(args: &Args, config: Option<&Config>) -> Result<PoliteClient, CliRunError> {
    let mut builder = PoliteClient::builder();
    if let Some(secs) = args.delay.or_else(|| config.and_then(|c| c.pause_secs)) {
        builder = builder.pause_secs(secs);
    }
    if let Some(ua) = args
        .user_agent
        .clone()
        .or_else(|| config.and_then(|c| c.user_agent.clone()))
    {
        builder = builder.user_agent(ua);
    }
    builder
        .build()
        .map_err(|e| CliRunError::InvalidInput(format!("Failed to create HTTP client: {}", e)))
}

/// Entry point for the CLI. Returns the run summary; Err only for setup problems.
pub fn run(args: &Args) -> Result<RunSummary, CliRunError> {
    let config = config::load_config().map_err(CliRunError::InvalidInput)?;
    let today = chrono::Local::now().date_naive();
    let plan = RunPlan::resolve(args, config.as_ref(), today)?;
    let mut client = build_client(args, config.as_ref())?;

    tracing::info!("Scraping up to {} books from {}", plan.max_records, plan.url);
    let summary = scrape(&mut client, &plan);
    if summary.records > 0 {
        client.courtesy_pause();
    }
    Ok(summary)
}
