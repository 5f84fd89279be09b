//! bookscrape: CLI scraper for book listing pages, outputting CSV.

pub mod cli;
pub mod config;
pub mod formats;
pub mod logging;
pub mod model;
pub mod scraper;

// Re-exports for CLI and consumers.
pub use formats::{write_records, FormatError, OutputFormat, WriteOutcome};
pub use model::{BookRecord, PLACEHOLDER};
pub use scraper::{
    robots, validate_url, Fetch, ListingExtractor, ListingSelectors, PoliteClient,
    PoliteClientBuilder, ScraperError,
};
