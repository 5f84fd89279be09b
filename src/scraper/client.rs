//! Blocking HTTP client with a browser-like User-Agent, per-request timeouts, and a courtesy pause.

use crate::scraper::error::ScraperError;
use std::time::Duration;

/// Desktop browser User-Agent; listing sites commonly reject obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAUSE_SECS: u64 = 2;
const MAX_REDIRECTS: usize = 10;

/// Source of page text. Implemented by [PoliteClient]; tests provide in-memory fetchers.
pub trait Fetch {
    /// GET `url` and return the body of a success response.
    ///
    /// Non-success statuses are returned as [ScraperError::HttpStatus]; an elapsed
    /// `timeout` as [ScraperError::Timeout].
    fn get_text(&mut self, url: &str, timeout: Duration) -> Result<String, ScraperError>;
}

/// Blocking HTTP client. Holds the courtesy pause observed once the run is done.
#[derive(Debug)]
pub struct PoliteClient {
    inner: reqwest::blocking::Client,
    pause: Duration,
}

impl PoliteClient {
    /// Build a client with default User-Agent, timeout, and pause.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    /// Builder for custom User-Agent, timeout, and/or pause.
    pub fn builder() -> PoliteClientBuilder {
        PoliteClientBuilder::default()
    }

    /// Configured courtesy pause.
    pub fn pause(&self) -> Duration {
        self.pause
    }

    /// Sleep for the courtesy pause. Called once after scraping to go easy on the server.
    pub fn courtesy_pause(&self) {
        if !self.pause.is_zero() {
            tracing::debug!("Pausing {:?} before exit", self.pause);
            std::thread::sleep(self.pause);
        }
    }
}

impl Fetch for PoliteClient {
    fn get_text(&mut self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        let response = self
            .inner
            .get(url)
            .timeout(timeout)
            .send()
            .map_err(|e| request_error(url, timeout, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        response.text().map_err(|e| {
            if e.is_timeout() {
                request_error(url, timeout, e)
            } else {
                ScraperError::BodyRead {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }
}

fn request_error(url: &str, timeout: Duration, e: reqwest::Error) -> ScraperError {
    if e.is_timeout() {
        ScraperError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        }
    } else {
        ScraperError::Network {
            url: url.to_string(),
            source: e,
        }
    }
}

/// Builder for PoliteClient with optional User-Agent, default timeout, and pause.
#[derive(Debug)]
pub struct PoliteClientBuilder {
    user_agent: Option<String>,
    timeout_secs: u64,
    pause_secs: u64,
}

impl Default for PoliteClientBuilder {
    fn default() -> Self {
        Self {
            user_agent: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pause_secs: DEFAULT_PAUSE_SECS,
        }
    }
}

impl PoliteClientBuilder {
    /// Set a custom User-Agent. If not set, [DEFAULT_USER_AGENT] is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Client-wide timeout in seconds, used when a request does not set its own. Default 10.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Courtesy pause in seconds. Default 2.
    pub fn pause_secs(mut self, secs: u64) -> Self {
        self.pause_secs = secs;
        self
    }

    /// Build the blocking client.
    pub fn build(self) -> Result<PoliteClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let inner = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(self.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(PoliteClient {
            inner,
            pause: Duration::from_secs(self.pause_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_pause() -> Result<(), reqwest::Error> {
        let client = PoliteClient::builder().pause_secs(0).build()?;
        assert!(client.pause().is_zero());
        client.courtesy_pause();
        Ok(())
    }

    #[test]
    fn default_pause_is_two_seconds() -> Result<(), reqwest::Error> {
        let client = PoliteClient::new()?;
        assert_eq!(client.pause(), Duration::from_secs(2));
        Ok(())
    }

    #[test]
    fn refused_connection_is_network_error() -> Result<(), String> {
        let mut client = PoliteClient::builder()
            .pause_secs(0)
            .build()
            .map_err(|e| e.to_string())?;
        // Port 1 on loopback is not listening in test environments.
        match client.get_text("http://127.0.0.1:1/robots.txt", Duration::from_secs(2)) {
            Err(ScraperError::Network { .. }) => Ok(()),
            other => Err(format!("expected network error, got {:?}", other)),
        }
    }
}
