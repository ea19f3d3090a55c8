//! Consumer-side engine: the visual window, its fill policy, and the
//! scroll clock.
//!
//! A [`Ticker`] owns everything the render path touches. Each frame the
//! host calls [`Ticker::tick`] with the elapsed time and then snapshots
//! [`Ticker::frame`]; the producer thread stays entirely behind the
//! hand-off channel and the status cell inside the [`FeedHandle`].
//!
//! # Invariants
//!
//! 1. `tick` never blocks: the hand-off queue is drained with non-blocking
//!    receives and the status cell is a lock-free snapshot.
//! 2. After `tick`, the window's covered height is at least the viewport
//!    plus one row whenever any headline has ever been seen; with no
//!    content ever, the window holds sentinel placeholder rows instead of
//!    going blank.
//! 3. Between two consecutive status rows there are exactly `inject_every`
//!    headline pulls; placeholder rows do not advance the cadence.
//! 4. `0 <= offset < row_height` whenever the window is non-empty.
//! 5. Replay re-inserts window headlines through the same guarded intake
//!    path as drained ones, so the intake buffer never holds two equal
//!    texts no matter where its contents came from.
//!
//! # Failure modes
//!
//! - Feed exhausted: replay keeps cycling the rows already on screen.
//! - Nothing ever fetched: one placeholder row is appended per fill call
//!   until the viewport is covered; placeholders are skip-listed so they
//!   are never recycled as real content.
//! - Oversized `dt` (a stall, a suspended laptop): every row retires, the
//!   residual offset is dropped, and the window refills from scratch.

use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{ConfigError, TickerConfig};
use crate::frame::{Anchor, FrameRow, TickerFrame};
use crate::intake::{InsertOutcome, IntakeBuffer};
use crate::item::{Item, ItemKind};
use crate::producer::FeedHandle;

/// Counters accumulated since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickerStats {
    /// Headlines received from the hand-off channel.
    pub drained: u64,
    /// Texts accepted into the intake buffer, by drain or replay.
    pub inserted: u64,
    /// Duplicate texts suppressed at intake.
    pub duplicates: u64,
    /// Empty or skip-listed texts dropped at intake.
    pub rejected: u64,
    /// Oldest-item evictions forced by capacity.
    pub evicted: u64,
    /// Headline copies re-inserted by cyclic replay.
    pub replayed: u64,
    /// Status rows injected into the window.
    pub status_injected: u64,
    /// Sentinel placeholder rows appended.
    pub placeholders: u64,
    /// Rows retired after scrolling fully past.
    pub retired: u64,
}

/// The ticker engine state machine.
#[derive(Debug)]
pub struct Ticker {
    config: TickerConfig,
    intake: IntakeBuffer,
    visual: VecDeque<Item>,
    offset: f32,
    since_status: u32,
    feed: FeedHandle,
    stats: TickerStats,
}

impl Ticker {
    /// Build the engine, validating the configuration first.
    pub fn new(config: TickerConfig, feed: FeedHandle) -> Result<Self, ConfigError> {
        config.validate()?;
        let intake = IntakeBuffer::new(config.effective_capacity(), &config.skip_texts);
        Ok(Self {
            config,
            intake,
            visual: VecDeque::new(),
            offset: 0.0,
            since_status: 0,
            feed,
            stats: TickerStats::default(),
        })
    }

    /// Advance the engine by `dt` of wall-clock time.
    ///
    /// Order matters: drain the queue, seed an empty window, advance the
    /// offset, retire rows that scrolled fully past, then top the window
    /// back up. Retirement and refill happen within the same tick so the
    /// window never under-fills for a frame.
    pub fn tick(&mut self, dt: Duration) {
        self.drain_feed();

        if self.visual.is_empty() {
            self.fill();
        }

        if !self.visual.is_empty() {
            self.offset += self.config.scroll_speed * dt.as_secs_f32();
        }

        while self.offset >= self.config.row_height && !self.visual.is_empty() {
            self.visual.pop_front();
            self.offset -= self.config.row_height;
            self.stats.retired += 1;
        }
        if self.visual.is_empty() && self.offset >= self.config.row_height {
            // One dt scrolled past the entire window; the refilled window
            // anchors cleanly at the top.
            self.offset = 0.0;
        }

        self.fill();
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn frame(&self) -> TickerFrame<'_> {
        let rows: Vec<FrameRow<'_>> = self
            .visual
            .iter()
            .map(|item| FrameRow::new(item, self.config.max_text_chars))
            .collect();
        let total_height = rows.len() as f32 * self.config.row_height;
        let anchor = if total_height > self.config.viewport_height {
            Anchor::Scroll
        } else {
            Anchor::Top
        };
        TickerFrame {
            rows,
            offset: self.offset,
            anchor,
            viewport_width: self.config.viewport_width,
            viewport_height: self.config.viewport_height,
            row_height: self.config.row_height,
        }
    }

    /// Pixels scrolled into the first row.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Counter snapshot.
    #[must_use]
    pub fn stats(&self) -> TickerStats {
        self.stats
    }

    /// The configuration in force.
    #[must_use]
    pub fn config(&self) -> &TickerConfig {
        &self.config
    }

    /// Height the window currently covers, accounting for the scrolled-off
    /// part of the first row.
    fn covered_height(&self) -> f32 {
        self.visual.len() as f32 * self.config.row_height - self.offset
    }

    /// Height the window must cover: the viewport plus one row of lookahead.
    fn target_height(&self) -> f32 {
        self.config.viewport_height + self.config.row_height
    }

    /// Move everything pending in the hand-off queue into the intake
    /// buffer. Returns how many messages the queue yielded, accepted or
    /// not.
    fn drain_feed(&mut self) -> usize {
        let mut received = 0usize;
        while let Ok(item) = self.feed.items.try_recv() {
            received += 1;
            let outcome = self.intake.insert(&item.text);
            self.record_insert(outcome);
        }
        self.stats.drained += received as u64;
        received
    }

    /// Grow the window until it covers the target height.
    ///
    /// Each iteration appends exactly one row or terminates. Priority:
    /// inject a due status, else pull from intake, else replay the rows on
    /// screen, else placeholder.
    fn fill(&mut self) {
        while self.covered_height() < self.target_height() {
            if self.since_status >= self.config.inject_every {
                let snippet = self.feed.status.load();
                self.visual.push_back(Item {
                    kind: ItemKind::Status,
                    ..snippet
                });
                self.since_status = 0;
                self.stats.status_injected += 1;
                continue;
            }

            if let Some(item) = self.intake.pop_oldest() {
                self.visual.push_back(item);
                self.since_status += 1;
                continue;
            }

            // Intake is dry. A channel receiver cannot be peeked, so probe
            // by draining: zero messages means the producer is idle and
            // replay may engage.
            let received = self.drain_feed();
            if !self.intake.is_empty() {
                continue;
            }
            if received > 0 {
                // The queue had data but nothing survived intake; leave
                // the window short rather than spin within one call.
                break;
            }

            if self.replay_into_intake() > 0 {
                continue;
            }

            self.visual.push_back(Item::placeholder());
            self.stats.placeholders += 1;
            tracing::debug!(target: "chyron.ticker", "no content anywhere, appended placeholder");
            break;
        }
    }

    /// Copy every headline currently on screen back into the intake
    /// buffer, oldest first, through the guarded insert path. Returns how
    /// many copies were accepted.
    fn replay_into_intake(&mut self) -> usize {
        let texts: Vec<String> = self
            .visual
            .iter()
            .filter(|item| item.is_headline())
            .map(|item| item.text.clone())
            .collect();

        let mut replayed = 0usize;
        for text in &texts {
            let outcome = self.intake.insert(text);
            if self.record_insert(outcome) {
                replayed += 1;
            }
        }
        if replayed > 0 {
            self.stats.replayed += replayed as u64;
            tracing::debug!(
                target: "chyron.ticker",
                count = replayed,
                "replayed on-screen headlines into intake"
            );
        }
        replayed
    }

    /// Fold one insert outcome into the stats. Returns whether the text
    /// entered the buffer.
    fn record_insert(&mut self, outcome: InsertOutcome) -> bool {
        match outcome {
            InsertOutcome::Inserted { evicted } => {
                self.stats.inserted += 1;
                if evicted {
                    self.stats.evicted += 1;
                }
                true
            }
            InsertOutcome::Duplicate => {
                self.stats.duplicates += 1;
                false
            }
            InsertOutcome::Empty | InsertOutcome::Skipped => {
                self.stats.rejected += 1;
                false
            }
        }
    }
}
