//! Fetching and extraction: shared HTTP client, robots.txt check, and listing extractor.

mod client;
mod error;

pub mod listing;
pub mod robots;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Fetch, PoliteClient, PoliteClientBuilder, DEFAULT_USER_AGENT};
pub use error::ScraperError;
pub use listing::{CompiledSelectors, ListingExtractor, ListingSelectors};

use reqwest::Url;

/// Validate a listing URL: must parse and use http or https.
pub fn validate_url(url_input: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(url_input).map_err(|e| ScraperError::InvalidUrl {
        input: url_input.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ScraperError::InvalidUrl {
                input: url_input.to_string(),
                reason: format!("unsupported scheme '{}'", other),
            })
        }
    }
    if url.host_str().is_none() {
        return Err(ScraperError::InvalidUrl {
            input: url_input.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(url)
}
