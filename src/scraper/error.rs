//! Shared error type for the fetch and extraction layer.

use thiserror::Error;

/// Scraper error for URL handling, HTTP, and listing parsing.
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Invalid URL: {input}: {reason}")]
    InvalidUrl { input: String, reason: String },

    // HTTP and network
    #[error("Network error: could not reach {url}: {source}")]
    Network { url: String, source: reqwest::Error },

    #[error("Timed out after {secs}s fetching: {url}")]
    Timeout { url: String, secs: u64 },

    #[error("HTTP {status} when fetching: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to read response body from {url}: {source}")]
    BodyRead { url: String, source: reqwest::Error },

    // Parsing
    #[error("Invalid {field} selector {selector:?}: {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("Listing item {position} contains a nested listing item (malformed markup).")]
    NestedListingItem { position: usize },
}
