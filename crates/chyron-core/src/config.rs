//! Engine configuration and fail-fast validation.
//!
//! Every knob is effect-documented on its field. Geometry is in pixels and
//! the scroll speed in pixels per second, so the engine stays agnostic of
//! the renderer's actual raster. Invalid values are programmer errors and
//! are rejected when the ticker is constructed, not discovered mid-run.

use std::time::Duration;

use thiserror::Error;

/// Boilerplate strings dropped at intake, compared case-insensitively.
///
/// `"no feed items"` is also the engine's own placeholder text; keeping it
/// here prevents a placeholder row from being recycled as real content.
pub const DEFAULT_SKIP_TEXTS: &[&str] = &["no feed items", "bbc news app", "play now"];

/// Rejected configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("row height must be finite and positive, got {value}")]
    RowHeight { value: f32 },

    #[error("scroll speed must be finite and non-negative, got {value}")]
    ScrollSpeed { value: f32 },

    #[error("viewport dimensions must be finite and positive, got {width}x{height}")]
    Viewport { width: f32, height: f32 },

    #[error("inject_every must be at least 1")]
    InjectEvery,

    #[error("max_items_per_fetch must be at least 1")]
    FetchCap,

    #[error("max_text_chars must be at least 1")]
    TextChars,

    #[error("fetch interval must be non-zero")]
    FetchInterval,

    #[error("capacity override must be at least 1")]
    Capacity,
}

/// Tuning for the ticker engine.
#[derive(Debug, Clone)]
pub struct TickerConfig {
    /// Horizontal space available to the renderer, in pixels. The engine
    /// only carries this through to the frame; text layout is the
    /// renderer's job.
    pub viewport_width: f32,
    /// Vertical space the visual window must cover, in pixels.
    pub viewport_height: f32,
    /// Height of one rendered row, in pixels. Retirement happens each time
    /// the scroll offset crosses this.
    pub row_height: f32,
    /// Scroll speed in pixels per second. Zero freezes the band.
    pub scroll_speed: f32,
    /// Headline rows between consecutive status injections. Minimum 1.
    pub inject_every: u32,
    /// How often the producer wakes to call the source.
    pub fetch_interval: Duration,
    /// Upper bound on headlines accepted from a single fetch.
    pub max_items_per_fetch: usize,
    /// Display-length cap applied when a frame is built; longer text is cut
    /// to this many graphemes, ellipsis included. Stored items keep their
    /// full text.
    pub max_text_chars: usize,
    /// Intake buffer capacity. `None` derives
    /// `max(4, 4 * visible_rows + max_items_per_fetch)`.
    pub capacity: Option<usize>,
    /// Texts dropped at intake (case-insensitive comparison).
    pub skip_texts: Vec<String>,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1214.0,
            viewport_height: 280.0,
            row_height: 28.0,
            scroll_speed: 20.0,
            inject_every: 10,
            fetch_interval: Duration::from_secs(60),
            max_items_per_fetch: 30,
            max_text_chars: 200,
            capacity: None,
            skip_texts: DEFAULT_SKIP_TEXTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TickerConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport size in pixels.
    pub fn viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the rendered row height in pixels.
    pub fn row_height(mut self, px: f32) -> Self {
        self.row_height = px;
        self
    }

    /// Set the scroll speed in pixels per second.
    pub fn scroll_speed(mut self, px_per_sec: f32) -> Self {
        self.scroll_speed = px_per_sec;
        self
    }

    /// Set how many headline rows separate consecutive status rows.
    pub fn inject_every(mut self, rows: u32) -> Self {
        self.inject_every = rows;
        self
    }

    /// Set the producer's fetch cadence.
    pub fn fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }

    /// Set the per-fetch headline cap.
    pub fn max_items_per_fetch(mut self, items: usize) -> Self {
        self.max_items_per_fetch = items;
        self
    }

    /// Set the render-time truncation length in graphemes.
    pub fn max_text_chars(mut self, chars: usize) -> Self {
        self.max_text_chars = chars;
        self
    }

    /// Override the derived intake capacity.
    pub fn capacity(mut self, slots: usize) -> Self {
        self.capacity = Some(slots);
        self
    }

    /// Replace the intake skip list.
    pub fn skip_texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_texts = texts.into_iter().map(Into::into).collect();
        self
    }

    /// Rows that fit fully inside the viewport, never less than one.
    #[must_use]
    pub fn visible_rows(&self) -> usize {
        let rows = (self.viewport_height / self.row_height).floor() as usize;
        rows.max(1)
    }

    /// Intake capacity actually in force: the override if set, otherwise
    /// `max(4, 4 * visible_rows + max_items_per_fetch)`.
    #[must_use]
    pub fn effective_capacity(&self) -> usize {
        self.capacity
            .unwrap_or_else(|| (4 * self.visible_rows() + self.max_items_per_fetch).max(4))
    }

    /// Check every field, returning the first offending one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.row_height.is_finite() || self.row_height <= 0.0 {
            return Err(ConfigError::RowHeight {
                value: self.row_height,
            });
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed < 0.0 {
            return Err(ConfigError::ScrollSpeed {
                value: self.scroll_speed,
            });
        }
        if !self.viewport_width.is_finite()
            || !self.viewport_height.is_finite()
            || self.viewport_width <= 0.0
            || self.viewport_height <= 0.0
        {
            return Err(ConfigError::Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if self.inject_every == 0 {
            return Err(ConfigError::InjectEvery);
        }
        if self.max_items_per_fetch == 0 {
            return Err(ConfigError::FetchCap);
        }
        if self.max_text_chars == 0 {
            return Err(ConfigError::TextChars);
        }
        if self.fetch_interval.is_zero() {
            return Err(ConfigError::FetchInterval);
        }
        if self.capacity == Some(0) {
            return Err(ConfigError::Capacity);
        }
        Ok(())
    }
}
