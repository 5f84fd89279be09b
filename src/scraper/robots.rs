//! robots.txt courtesy check. Fails open: only a fetched document with a disallow rule blocks the run.

use crate::scraper::client::Fetch;
use crate::scraper::error::ScraperError;
use reqwest::Url;
use std::time::Duration;

/// Default timeout for the robots.txt request.
pub const DEFAULT_ROBOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// Substrings that mark a robots.txt as restrictive. `Disallow: /` also matches any
/// path-bearing rule; `/search` is listed separately since that is the rule listing pages hit.
const DISALLOW_MARKERS: [&str; 2] = ["Disallow: /search", "Disallow: /"];

/// URL of the robots.txt at the root of `target_url` (scheme, host, and port kept).
pub fn robots_url(target_url: &str) -> Result<String, ScraperError> {
    let parsed = Url::parse(target_url).map_err(|e| ScraperError::InvalidUrl {
        input: target_url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.host_str().is_none() {
        return Err(ScraperError::InvalidUrl {
            input: target_url.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    parsed
        .join("/robots.txt")
        .map(String::from)
        .map_err(|e| ScraperError::InvalidUrl {
            input: target_url.to_string(),
            reason: e.to_string(),
        })
}

/// True if the robots.txt text contains any disallow marker.
pub fn robots_disallows(text: &str) -> bool {
    DISALLOW_MARKERS.iter().any(|m| text.contains(m))
}

/// Fetch robots.txt for `target_url` and decide whether scraping may proceed.
///
/// Returns false only when the document was fetched and contains a disallow marker.
pub fn check(fetcher: &mut dyn Fetch, target_url: &str, timeout: Duration) -> bool {
    let url = match robots_url(target_url) {
        Ok(u) => u,
        Err(e) => {
            tracing::error!("Error checking robots.txt: {}", e);
            return true;
        }
    };
    match fetcher.get_text(&url, timeout) {
        Ok(text) => {
            if robots_disallows(&text) {
                tracing::warn!("Scraping may be restricted by robots.txt at {}", url);
                false
            } else {
                true
            }
        }
        Err(ScraperError::HttpStatus { status, .. }) => {
            tracing::debug!("robots.txt returned HTTP {}; assuming allowed", status);
            true
        }
        Err(e) => {
            tracing::error!("Error checking robots.txt: {}", e);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::testing::{capture_logs, StubFetcher};
    use tracing::Level;

    const SITE: &str = "https://www.goodreads.com/book/popular_by_date";
    const ROBOTS: &str = "https://www.goodreads.com/robots.txt";

    #[test]
    fn robots_url_keeps_scheme_host_and_port() -> Result<(), ScraperError> {
        assert_eq!(robots_url(SITE)?, ROBOTS);
        assert_eq!(
            robots_url("http://localhost:8080/a/b?c=d")?,
            "http://localhost:8080/robots.txt"
        );
        Ok(())
    }

    #[test]
    fn robots_url_rejects_garbage() {
        assert!(matches!(
            robots_url("not a url"),
            Err(ScraperError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn disallows_on_either_marker() {
        assert!(robots_disallows("User-agent: *\nDisallow: /"));
        assert!(robots_disallows("User-agent: *\nDisallow: /search\n"));
        assert!(robots_disallows("Disallow: /admin"));
    }

    #[test]
    fn allows_without_markers() {
        assert!(!robots_disallows(""));
        assert!(!robots_disallows("User-agent: *\nAllow: /\n"));
        assert!(!robots_disallows("User-agent: *\nDisallow:\n"));
    }

    #[test]
    fn check_denies_when_document_disallows() {
        let mut f = StubFetcher::new().page(ROBOTS, "User-agent: *\nDisallow: /search");
        let (allowed, logs) = capture_logs(|| check(&mut f, SITE, DEFAULT_ROBOTS_TIMEOUT));
        assert!(!allowed);
        assert_eq!(f.requested(), [ROBOTS]);
        assert_eq!(
            logs.at(Level::WARN),
            [format!("Scraping may be restricted by robots.txt at {}", ROBOTS)]
        );
    }

    #[test]
    fn check_allows_permissive_document() {
        let mut f = StubFetcher::new().page(ROBOTS, "User-agent: *\nAllow: /\n");
        assert!(check(&mut f, SITE, DEFAULT_ROBOTS_TIMEOUT));
    }

    #[test]
    fn check_fails_open_on_timeout() {
        let mut f = StubFetcher::new().timeout(ROBOTS);
        let (allowed, logs) = capture_logs(|| check(&mut f, SITE, DEFAULT_ROBOTS_TIMEOUT));
        assert!(allowed);
        assert!(logs.contains(Level::ERROR, "Error checking robots.txt"));
        assert!(logs.at(Level::WARN).is_empty());
    }

    #[test]
    fn check_fails_open_on_http_error() {
        let mut f = StubFetcher::new().status(ROBOTS, 404);
        let (allowed, logs) = capture_logs(|| check(&mut f, SITE, DEFAULT_ROBOTS_TIMEOUT));
        assert!(allowed);
        assert!(logs.contains(Level::DEBUG, "HTTP 404"));
        assert!(logs.at(Level::ERROR).is_empty());
    }

    #[test]
    fn check_fails_open_on_invalid_target() {
        let mut f = StubFetcher::new();
        assert!(check(&mut f, "nope", DEFAULT_ROBOTS_TIMEOUT));
        assert!(f.requested().is_empty());
    }
}
