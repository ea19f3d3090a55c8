//! The seam between the engine and whatever supplies its content.
//!
//! The engine never talks to the network. It sees a [`Source`]: two
//! synchronous, possibly slow, possibly failing calls that run on the
//! producer thread. Real adapters live in the `chyron-feed` crate;
//! [`StaticSource`] covers demos and tests.

use crate::item::Icon;

/// Errors from a source are opaque to the engine; the producer logs them
/// and degrades, it never inspects them.
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Supplier of headline batches and status snippets.
///
/// `fetch_items` returns headlines in feed order, newest first; the
/// producer enqueues them oldest-first so display order matches
/// publication order. Both calls may block for seconds; they run on the
/// producer's thread, never on the render path. Failures are returned as
/// `Err` and absorbed at the producer boundary.
pub trait Source: Send {
    /// Fetch up to `limit` headlines, newest first.
    fn fetch_items(&mut self, limit: usize) -> Result<Vec<String>, SourceError>;

    /// Fetch the current status snippet and its icon.
    fn fetch_status(&mut self) -> Result<(String, Icon), SourceError>;
}

/// Canned source with a fixed headline list and status.
///
/// With `serve_once` set, the headline list is returned only from the first
/// `fetch_items` call and later calls return empty batches, which drives the
/// engine into its replay path without any network involved.
#[derive(Debug, Clone)]
pub struct StaticSource {
    items: Vec<String>,
    status_text: String,
    status_icon: Icon,
    serve_once: bool,
    served: bool,
}

impl StaticSource {
    /// A source that serves the same headlines on every fetch.
    pub fn new<I, S>(items: I, status_text: impl Into<String>, status_icon: Icon) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            status_text: status_text.into(),
            status_icon,
            serve_once: false,
            served: false,
        }
    }

    /// Serve the headline list once, then empty batches.
    pub fn serve_once(mut self) -> Self {
        self.serve_once = true;
        self
    }
}

impl Source for StaticSource {
    fn fetch_items(&mut self, limit: usize) -> Result<Vec<String>, SourceError> {
        if self.serve_once && self.served {
            return Ok(Vec::new());
        }
        self.served = true;
        Ok(self.items.iter().take(limit).cloned().collect())
    }

    fn fetch_status(&mut self) -> Result<(String, Icon), SourceError> {
        Ok((self.status_text.clone(), self.status_icon))
    }
}
