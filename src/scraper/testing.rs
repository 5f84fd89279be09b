//! In-memory fetcher and log capture for tests.

use crate::scraper::client::Fetch;
use crate::scraper::error::ScraperError;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

enum Canned {
    Body(String),
    Status(u16),
    Timeout,
}

/// Serves canned responses by URL. Unknown URLs answer HTTP 404.
#[derive(Default)]
pub(crate) struct StubFetcher {
    responses: HashMap<String, Canned>,
    requested: Vec<String>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, body: &str) -> Self {
        self.responses
            .insert(url.to_string(), Canned::Body(body.to_string()));
        self
    }

    pub(crate) fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    pub(crate) fn timeout(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Timeout);
        self
    }

    /// URLs requested so far, in order.
    pub(crate) fn requested(&self) -> &[String] {
        &self.requested
    }
}

impl Fetch for StubFetcher {
    fn get_text(&mut self, url: &str, timeout: Duration) -> Result<String, ScraperError> {
        self.requested.push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Body(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(ScraperError::HttpStatus {
                status: *status,
                url: url.to_string(),
            }),
            Some(Canned::Timeout) => Err(ScraperError::Timeout {
                url: url.to_string(),
                secs: timeout.as_secs(),
            }),
            None => Err(ScraperError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// Log events recorded by [capture_logs], as (level, rendered message).
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<(Level, String)>>>);

impl CapturedLogs {
    /// Messages logged at exactly `level`, in emission order.
    pub(crate) fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub(crate) fn contains(&self, level: Level, needle: &str) -> bool {
        self.at(level).iter().any(|m| m.contains(needle))
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let CaptureLayer(logs) = self;
        logs.0
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((*event.metadata().level(), visitor.0));
    }
}

#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

/// Run `f` with a thread-local subscriber that records every event it emits.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, CapturedLogs) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(logs.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs)
}
