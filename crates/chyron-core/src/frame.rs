//! Per-frame snapshot handed to the renderer.
//!
//! The engine does no glyph work. Each frame it exposes the ordered visual
//! window, the sub-row scroll offset, and an anchor rule saying whether the
//! offset applies at all. Text is length-capped here, at snapshot time; the
//! items stored in the window are never mutated.

use std::borrow::Cow;

use unicode_segmentation::UnicodeSegmentation;

use crate::item::{Icon, Item, ItemKind};

/// How the renderer should position the window vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Window is taller than the viewport: subtract the offset, content
    /// scrolls.
    Scroll,
    /// Window fits inside the viewport: pin to the top and ignore the
    /// offset.
    Top,
}

/// One renderable row.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRow<'a> {
    pub kind: ItemKind,
    /// Display text, truncated to the configured grapheme budget. Borrowed
    /// from the stored item unless truncation had to allocate.
    pub text: Cow<'a, str>,
    pub icon: Icon,
}

impl<'a> FrameRow<'a> {
    pub(crate) fn new(item: &'a Item, max_text_chars: usize) -> Self {
        Self {
            kind: item.kind,
            text: truncate_text(&item.text, max_text_chars),
            icon: item.icon,
        }
    }
}

/// Snapshot of everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct TickerFrame<'a> {
    /// Rows in display order, oldest (topmost) first.
    pub rows: Vec<FrameRow<'a>>,
    /// Pixels scrolled into the first row. Meaningful only when `anchor`
    /// is [`Anchor::Scroll`]; see [`TickerFrame::draw_offset`].
    pub offset: f32,
    pub anchor: Anchor,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub row_height: f32,
}

impl TickerFrame<'_> {
    /// The offset the renderer should actually subtract: the scroll offset
    /// when anchored to it, zero when pinned to the top.
    #[must_use]
    pub fn draw_offset(&self) -> f32 {
        match self.anchor {
            Anchor::Scroll => self.offset,
            Anchor::Top => 0.0,
        }
    }

    /// Total height of the window in pixels.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.rows.len() as f32 * self.row_height
    }
}

/// Cap `text` at `max_graphemes`, ellipsis included.
///
/// Returns the input unchanged when it fits. Otherwise keeps the first
/// `max_graphemes - 1` grapheme clusters and appends `…`, so the result is
/// exactly `max_graphemes` graphemes and never splits a cluster.
pub fn truncate_text(text: &str, max_graphemes: usize) -> Cow<'_, str> {
    // Validation guarantees a budget of at least 1.
    let mut cut = 0;
    let mut count = 0usize;
    for (idx, _) in text.grapheme_indices(true) {
        count += 1;
        if count == max_graphemes {
            cut = idx;
        } else if count > max_graphemes {
            let mut out = String::with_capacity(cut + 3);
            out.push_str(&text[..cut]);
            out.push('…');
            return Cow::Owned(out);
        }
    }
    Cow::Borrowed(text)
}
