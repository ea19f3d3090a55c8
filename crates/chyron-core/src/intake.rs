//! Bounded, deduplicated staging buffer for not-yet-displayed headlines.
//!
//! Headlines drained from the producer wait here until the visual window
//! pulls them. The buffer preserves arrival order and enforces three rules
//! on the way in (trim, skip list, duplicate suppression) and one on the
//! way out of the back (FIFO eviction once over capacity).
//!
//! # Invariants
//!
//! 1. No two resident items share equal text (case-sensitive).
//! 2. `buffered_texts` mirrors buffer membership exactly: a text enters the
//!    set when its item is appended and leaves when the item does, whether
//!    by consumption or eviction. It is not a history, so a text that has
//!    left may be inserted again later. Cyclic replay depends on this.
//! 3. `len() <= capacity` after every operation; eviction always removes
//!    the oldest item, never the newest.

use std::collections::{HashSet, VecDeque};

use crate::item::Item;

/// What became of one offered headline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Appended; `evicted` reports whether the oldest item was pushed out
    /// to stay within capacity.
    Inserted { evicted: bool },
    /// Dropped: nothing left after trimming whitespace.
    Empty,
    /// Dropped: matched the skip list (case-insensitive).
    Skipped,
    /// Dropped: equal text already resident.
    Duplicate,
}

impl InsertOutcome {
    /// Whether the text actually entered the buffer.
    #[must_use]
    pub fn is_inserted(self) -> bool {
        matches!(self, InsertOutcome::Inserted { .. })
    }
}

/// FIFO staging buffer with membership-only duplicate suppression.
#[derive(Debug)]
pub struct IntakeBuffer {
    rows: VecDeque<Item>,
    buffered_texts: HashSet<String>,
    capacity: usize,
    /// Lowercased once at construction; candidates are lowercased per check.
    skip_texts: Vec<String>,
}

impl IntakeBuffer {
    /// Create a buffer holding at most `capacity` items.
    ///
    /// `capacity` must be at least 1; configuration validation enforces
    /// this before the buffer is built.
    pub fn new(capacity: usize, skip_texts: &[String]) -> Self {
        Self {
            rows: VecDeque::with_capacity(capacity.min(64)),
            buffered_texts: HashSet::new(),
            capacity,
            skip_texts: skip_texts.iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    /// Offer one raw headline text.
    ///
    /// The text is trimmed, then rejected if empty, on the skip list, or
    /// already resident. On acceptance the oldest item is evicted if the
    /// buffer would exceed capacity.
    pub fn insert(&mut self, raw: &str) -> InsertOutcome {
        let text = raw.trim();
        if text.is_empty() {
            return InsertOutcome::Empty;
        }

        let lowered = text.to_lowercase();
        if self.skip_texts.iter().any(|skip| *skip == lowered) {
            tracing::trace!(target: "chyron.intake", text = %text, "dropped skip-list match");
            return InsertOutcome::Skipped;
        }

        if self.buffered_texts.contains(text) {
            tracing::trace!(target: "chyron.intake", text = %text, "dropped duplicate");
            return InsertOutcome::Duplicate;
        }

        self.buffered_texts.insert(text.to_string());
        self.rows.push_back(Item::headline(text));

        let evicted = if self.rows.len() > self.capacity {
            if let Some(oldest) = self.rows.pop_front() {
                self.buffered_texts.remove(&oldest.text);
                tracing::trace!(target: "chyron.intake", text = %oldest.text, "evicted oldest");
            }
            true
        } else {
            false
        };

        InsertOutcome::Inserted { evicted }
    }

    /// Take the oldest item for display, releasing its text for future
    /// re-insertion.
    pub fn pop_oldest(&mut self) -> Option<Item> {
        let item = self.rows.pop_front()?;
        self.buffered_texts.remove(&item.text);
        Some(item)
    }

    /// Number of items waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `text` is currently resident (exact, case-sensitive).
    #[must_use]
    pub fn contains_text(&self, text: &str) -> bool {
        self.buffered_texts.contains(text)
    }

    /// Waiting items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.rows.iter()
    }
}
