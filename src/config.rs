//! Optional config file loading. Search order: ./bookscrape.toml, then
//! $XDG_CONFIG_HOME/bookscrape/config.toml (or ~/.config/bookscrape/config.toml).

use crate::scraper::ListingSelectors;
use serde::Deserialize;
use std::path::PathBuf;

/// Config file contents. All fields optional; only present keys override defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Config {
    /// Listing page to scrape.
    pub url: Option<String>,
    /// Maximum number of records taken from the page.
    pub max_records: Option<usize>,
    /// Directory for the default output file when -o is not set. Paths are relative to CWD.
    pub output_dir: Option<PathBuf>,
    /// Output format: csv, tsv, or json.
    pub format: Option<String>,
    /// HTTP User-Agent header.
    pub user_agent: Option<String>,
    /// Timeout in seconds for the robots.txt request.
    pub robots_timeout_secs: Option<u64>,
    /// Timeout in seconds for the listing page request.
    pub listing_timeout_secs: Option<u64>,
    /// Courtesy pause in seconds after a successful scrape.
    pub pause_secs: Option<u64>,
    /// CSS selectors; missing keys keep the Goodreads defaults.
    pub selectors: Option<ListingSelectors>,
}

/// Search order: (1) ./bookscrape.toml, (2) $XDG_CONFIG_HOME/bookscrape/config.toml.
/// Missing file returns Ok(None). Invalid TOML or I/O error reading a present file returns Err.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let mut paths = vec![cwd.join("bookscrape.toml")];
    if let Some(d) = dirs::config_dir() {
        paths.push(d.join("bookscrape").join("config.toml"));
    }
    for path in &paths {
        if path.exists() {
            let s = std::fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            let config: Config = toml::from_str(&s)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
            tracing::debug!("Loaded config from {}", path.display());
            return Ok(Some(config));
        }
    }
    Ok(None)
}
