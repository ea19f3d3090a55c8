#![forbid(unsafe_code)]

//! Network source adapters for the chyron ticker.
//!
//! # Role in chyron
//! Everything that touches the network lives here: blocking RSS headline
//! fetches and Open-Meteo current-conditions lookups, glued together as one
//! [`Source`] implementation the engine's producer thread can poll. The
//! engine never sees URLs, XML, or JSON; it sees headline strings and one
//! `(text, icon)` status pair per cycle.
//!
//! Errors cross the [`Source`] seam as boxed [`FeedError`]s; the producer
//! logs them and degrades (empty batch, fallback status) rather than
//! stopping the band.
//!
//! ```no_run
//! use chyron_core::TickerConfig;
//! use chyron_feed::{DEFAULT_FEED_URL, NewsWeatherSource, OpenMeteoStatus, RssHeadlines};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = NewsWeatherSource::new(
//!         RssHeadlines::new(DEFAULT_FEED_URL)?,
//!         OpenMeteoStatus::new(52.23, 21.01, "Warsaw")?,
//!     );
//!     let (mut ticker, producer) = chyron_core::start(TickerConfig::new(), source)?;
//!     ticker.tick(std::time::Duration::from_millis(16));
//!     producer.stop();
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod rss;
pub mod weather;

pub use error::{FeedError, Result};
pub use rss::{DEFAULT_FEED_URL, RssHeadlines};
pub use weather::{DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_PLACE, OpenMeteoStatus};

use chyron_core::{Icon, Source, SourceError};

/// The production source pair: RSS headlines plus a weather status line.
#[derive(Debug)]
pub struct NewsWeatherSource {
    rss: RssHeadlines,
    weather: OpenMeteoStatus,
}

impl NewsWeatherSource {
    #[must_use]
    pub fn new(rss: RssHeadlines, weather: OpenMeteoStatus) -> Self {
        Self { rss, weather }
    }
}

impl Source for NewsWeatherSource {
    fn fetch_items(&mut self, limit: usize) -> std::result::Result<Vec<String>, SourceError> {
        Ok(self.rss.fetch(limit)?)
    }

    fn fetch_status(&mut self) -> std::result::Result<(String, Icon), SourceError> {
        Ok(self.weather.fetch()?)
    }
}
