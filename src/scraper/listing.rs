//! Listing page extractor. Fetches one page and turns each listing item (one table row per book
//! on Goodreads) into a [BookRecord].
//!
//! Each field is looked up independently; a missing field becomes [PLACEHOLDER](crate::model::PLACEHOLDER)
//! and never drops the record. Only a structurally broken item is skipped.

use crate::model::BookRecord;
use crate::scraper::client::Fetch;
use crate::scraper::error::ScraperError;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::time::Duration;

/// Default timeout for the listing page request.
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(10);

/// CSS selectors for a listing page. Defaults match Goodreads list tables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ListingSelectors {
    /// One match per book.
    pub item: String,
    pub title: String,
    pub author: String,
    pub rating: String,
    pub publication_date: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            item: "tr[itemscope]".to_string(),
            title: "a.bookTitle".to_string(),
            author: "a.authorName".to_string(),
            rating: r#"span[itemprop="ratingValue"]"#.to_string(),
            publication_date: r#"span[itemprop="datePublished"]"#.to_string(),
        }
    }
}

impl ListingSelectors {
    /// Parse every selector once. Fails on the first invalid one.
    pub fn compile(&self) -> Result<CompiledSelectors, ScraperError> {
        Ok(CompiledSelectors {
            item: parse_selector("item", &self.item)?,
            title: parse_selector("title", &self.title)?,
            author: parse_selector("author", &self.author)?,
            rating: parse_selector("rating", &self.rating)?,
            publication_date: parse_selector("publication_date", &self.publication_date)?,
        })
    }
}

/// Parsed form of [ListingSelectors].
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    item: Selector,
    title: Selector,
    author: Selector,
    rating: Selector,
    publication_date: Selector,
}

/// Parse a CSS selector or return a parse error (avoids panics from Selector::parse).
fn parse_selector(field: &'static str, sel: &str) -> Result<Selector, ScraperError> {
    Selector::parse(sel).map_err(|e| ScraperError::InvalidSelector {
        field,
        selector: sel.to_string(),
        reason: e.to_string(),
    })
}

/// Fetches a listing page and extracts book records from it.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    selectors: CompiledSelectors,
    timeout: Duration,
}

impl ListingExtractor {
    pub fn new(selectors: CompiledSelectors) -> Self {
        Self {
            selectors,
            timeout: DEFAULT_LISTING_TIMEOUT,
        }
    }

    /// Extractor with the default Goodreads selectors.
    pub fn goodreads() -> Result<Self, ScraperError> {
        Ok(Self::new(ListingSelectors::default().compile()?))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch `url` and return up to `max_records` records in document order.
    ///
    /// Any fetch failure is logged and yields an empty list.
    pub fn extract(
        &self,
        fetcher: &mut dyn Fetch,
        url: &str,
        max_records: usize,
    ) -> Vec<BookRecord> {
        let html = match fetcher.get_text(url, self.timeout) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("Error fetching page: {}", e);
                return Vec::new();
            }
        };
        match self.match_listing(&html, max_records) {
            Some(records) => {
                tracing::info!("Scraped {} books successfully.", records.len());
                records
            }
            None => Vec::new(),
        }
    }

    /// Extract records from an already fetched page.
    pub fn parse_listing(&self, html: &str, max_records: usize) -> Vec<BookRecord> {
        self.match_listing(html, max_records).unwrap_or_default()
    }

    /// `None` when no listing item matched at all.
    fn match_listing(&self, html: &str, max_records: usize) -> Option<Vec<BookRecord>> {
        let doc = Html::parse_document(html);
        let items: Vec<ElementRef<'_>> = doc.select(&self.selectors.item).collect();
        if items.is_empty() {
            let element_count = doc
                .root_element()
                .descendants()
                .filter(|n| n.value().is_element())
                .count();
            tracing::warn!(
                "No books found. Check the CSS selector or page structure ({} elements on page).",
                element_count
            );
            return None;
        }
        tracing::debug!("{} listing items matched", items.len());

        let mut records = Vec::with_capacity(items.len().min(max_records));
        for (i, item) in items.into_iter().take(max_records).enumerate() {
            match self.parse_item(item, i + 1) {
                Ok(record) => {
                    tracing::info!("Scraped: {}", record.title);
                    records.push(record);
                }
                Err(e) => {
                    tracing::error!("Error processing book: {}", e);
                }
            }
        }
        Some(records)
    }

    fn parse_item(&self, item: ElementRef<'_>, position: usize) -> Result<BookRecord, ScraperError> {
        // A nested item would leak its fields into this one's lookups.
        let nested = item
            .select(&self.selectors.item)
            .any(|inner| inner.id() != item.id());
        if nested {
            return Err(ScraperError::NestedListingItem { position });
        }
        Ok(BookRecord::from_parts(
            locate(item, &self.selectors.title),
            locate(item, &self.selectors.author),
            locate(item, &self.selectors.rating),
            locate(item, &self.selectors.publication_date),
        ))
    }
}

/// Text of the first descendant matching `sel`, or None if absent or blank.
fn locate(item: ElementRef<'_>, sel: &Selector) -> Option<String> {
    item.select(sel)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Element text with each text node trimmed and pieces joined by a single space.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
