#![forbid(unsafe_code)]

//! Core: the ticker buffering engine behind a chyron band.
//!
//! # Role in chyron
//! `chyron-core` turns an intermittent trickle of short feed texts into a
//! smooth, never-blank scrolling band. It owns the background fetch loop,
//! the bounded deduplicating intake buffer, the status-injection cadence,
//! and the frame-rate-independent scroll clock.
//!
//! # Primary responsibilities
//! - **Producer**: one background thread fetching on a fixed interval,
//!   pushing headlines into a hand-off channel and refreshing an
//!   atomically-swapped status snapshot.
//! - **IntakeBuffer**: bounded FIFO staging with trim, skip-list, and
//!   membership-only duplicate suppression.
//! - **Ticker**: the per-frame state machine filling the visual window,
//!   injecting status rows on a cadence, replaying on-screen headlines
//!   when the feed runs dry, and retiring rows as they scroll past.
//! - **TickerFrame**: the rendering contract, with render-time text
//!   truncation and the scroll-vs-pinned anchor rule.
//!
//! # How it fits in the system
//! Network adapters live in `chyron-feed` and reach the engine only
//! through the [`Source`] trait; renderers consume only [`TickerFrame`].
//! The engine itself does no I/O besides the producer thread it owns.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use chyron_core::{Icon, StaticSource, TickerConfig};
//!
//! let config = TickerConfig::new().fetch_interval(Duration::from_secs(30));
//! let source = StaticSource::new(["hello world"], "12.0°C, clear", Icon::Sun);
//! let (mut ticker, producer) = chyron_core::start(config, source).unwrap();
//!
//! ticker.tick(Duration::from_millis(16));
//! for row in &ticker.frame().rows {
//!     println!("{} {}", row.icon.name(), row.text);
//! }
//! producer.stop();
//! ```

pub mod config;
pub mod frame;
pub mod intake;
pub mod item;
pub mod producer;
pub mod source;
pub mod status;
pub mod ticker;

pub use config::{ConfigError, DEFAULT_SKIP_TEXTS, TickerConfig};
pub use frame::{Anchor, FrameRow, TickerFrame, truncate_text};
pub use intake::{InsertOutcome, IntakeBuffer};
pub use item::{FALLBACK_STATUS_TEXT, Icon, Item, ItemKind, PLACEHOLDER_TEXT};
pub use producer::{FeedHandle, Producer};
pub use source::{Source, SourceError, StaticSource};
pub use status::StatusCell;
pub use ticker::{Ticker, TickerStats};

/// Wire a producer thread and a ticker together from one configuration.
///
/// Validates `config` before anything is spawned, so an invalid
/// configuration never leaks a thread.
pub fn start<S>(config: TickerConfig, source: S) -> Result<(Ticker, Producer), ConfigError>
where
    S: Source + 'static,
{
    config.validate()?;
    let (producer, feed) = Producer::spawn(source, &config);
    let ticker = Ticker::new(config, feed)?;
    Ok((ticker, producer))
}
