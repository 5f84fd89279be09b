//! Canonical data model for scraped listings.
//!
//! The listing extractor produces [BookRecord]s and the record writer consumes them.

use serde::{Deserialize, Serialize};

/// Text stored in any field that could not be located on a listing item.
pub const PLACEHOLDER: &str = "N/A";

/// One book as displayed on a listing page.
///
/// Field order is the column order of every output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    /// Displayed rating text (e.g. "4.32"); not parsed, formatting varies by site.
    pub rating: String,
    /// Free-form publication date as displayed.
    pub publication_date: String,
}

impl BookRecord {
    /// Column names in field order.
    pub const COLUMNS: [&'static str; 4] = ["title", "author", "rating", "publication_date"];

    /// Build a record, replacing every missing field with [PLACEHOLDER].
    pub fn from_parts(
        title: Option<String>,
        author: Option<String>,
        rating: Option<String>,
        publication_date: Option<String>,
    ) -> Self {
        let or_placeholder = |v: Option<String>| v.unwrap_or_else(|| PLACEHOLDER.to_string());
        Self {
            title: or_placeholder(title),
            author: or_placeholder(author),
            rating: or_placeholder(rating),
            publication_date: or_placeholder(publication_date),
        }
    }
}
