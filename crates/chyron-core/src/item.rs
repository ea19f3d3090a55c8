//! Ticker content items: the value objects that flow through the engine.
//!
//! An [`Item`] is a single row of ticker content. Items carry no identity
//! beyond their text; duplicate suppression in the intake buffer compares
//! `text` case-sensitively and nothing else.

/// What a row is, which decides both styling and engine treatment.
///
/// Headline rows participate in replay and count toward the status-injection
/// cadence. Status rows are injected from the cached snapshot and are never
/// replayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A short text unit pulled from the external feed.
    Headline,
    /// The periodically refreshed status snippet (weather or similar).
    Status,
}

/// Symbolic icon id attached to a row, resolved to a bitmap by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Icon {
    /// Generic feed glyph, used for every headline row.
    #[default]
    Headline,
    Sun,
    Cloud,
    Rain,
    Snow,
    Thunder,
}

impl Icon {
    /// Stable name the renderer uses to look up the glyph bitmap.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Icon::Headline => "headline",
            Icon::Sun => "sun",
            Icon::Cloud => "cloud",
            Icon::Rain => "rain",
            Icon::Snow => "snow",
            Icon::Thunder => "thunder",
        }
    }
}

/// Text shown when the engine has never seen a headline and the feed is idle.
///
/// The intake skip list contains this string, so a placeholder scrolling in
/// the visual window is never recycled back into the buffer as real content.
pub const PLACEHOLDER_TEXT: &str = "no feed items";

/// Status shown before the first successful fetch and after a failed refresh.
pub const FALLBACK_STATUS_TEXT: &str = "status unavailable";

/// One row of ticker content.
///
/// `text` is stored untruncated; display-length limits are applied when a
/// frame snapshot is built, never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub kind: ItemKind,
    pub text: String,
    pub icon: Icon,
}

impl Item {
    /// A headline row with the generic feed icon.
    pub fn headline(text: impl Into<String>) -> Self {
        Self {
            kind: ItemKind::Headline,
            text: text.into(),
            icon: Icon::Headline,
        }
    }

    /// A status row with an explicit icon.
    pub fn status(text: impl Into<String>, icon: Icon) -> Self {
        Self {
            kind: ItemKind::Status,
            text: text.into(),
            icon,
        }
    }

    /// The sentinel row appended when no headline has ever been available.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::headline(PLACEHOLDER_TEXT)
    }

    /// The status value used before the first fetch and after a failed one.
    #[must_use]
    pub fn fallback_status() -> Self {
        Self::status(FALLBACK_STATUS_TEXT, Icon::Cloud)
    }

    /// Whether this row is feed content (as opposed to an injected status).
    #[must_use]
    pub fn is_headline(&self) -> bool {
        self.kind == ItemKind::Headline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icon_names_are_stable() {
        assert_eq!(Icon::Headline.name(), "headline");
        assert_eq!(Icon::Sun.name(), "sun");
        assert_eq!(Icon::Cloud.name(), "cloud");
        assert_eq!(Icon::Rain.name(), "rain");
        assert_eq!(Icon::Snow.name(), "snow");
        assert_eq!(Icon::Thunder.name(), "thunder");
    }

    #[test]
    fn headline_constructor_uses_feed_icon() {
        let item = Item::headline("markets rally");
        assert_eq!(item.kind, ItemKind::Headline);
        assert_eq!(item.icon, Icon::Headline);
        assert!(item.is_headline());
    }

    #[test]
    fn placeholder_is_a_headline_with_sentinel_text() {
        let item = Item::placeholder();
        assert!(item.is_headline());
        assert_eq!(item.text, PLACEHOLDER_TEXT);
    }

    #[test]
    fn fallback_status_is_not_a_headline() {
        let item = Item::fallback_status();
        assert_eq!(item.kind, ItemKind::Status);
        assert_eq!(item.icon, Icon::Cloud);
        assert!(!item.is_headline());
    }
}
