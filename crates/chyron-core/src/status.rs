//! Atomically replaceable slot for the most recent status snippet.
//!
//! The producer refreshes the status on its own clock while the consumer
//! reads it at injection time. A lock here would let a stalled producer
//! thread hold up frame production, so the slot is an [`ArcSwap`]: stores
//! publish a fully-formed value, loads take a snapshot without blocking,
//! and a reader can never observe a half-written update.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::item::Item;

/// Shared one-writer/one-reader slot holding the cached status item.
#[derive(Debug)]
pub struct StatusCell {
    inner: ArcSwap<Item>,
}

impl StatusCell {
    /// Create a cell holding `initial`.
    pub fn new(initial: Item) -> Self {
        Self {
            inner: ArcSwap::from_pointee(initial),
        }
    }

    /// Snapshot the current status.
    ///
    /// Returns a clone so the caller owns the value outright; the producer
    /// may replace the cell contents at any moment after this returns.
    #[must_use]
    pub fn load(&self) -> Item {
        Item::clone(&self.inner.load())
    }

    /// Publish a new status, replacing the previous one wholesale.
    pub fn store(&self, item: Item) {
        self.inner.store(Arc::new(item));
    }
}

impl Default for StatusCell {
    /// Starts from the fallback status so injection is possible before the
    /// first fetch completes.
    fn default() -> Self {
        Self::new(Item::fallback_status())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::item::Icon;

    #[test]
    fn load_returns_what_was_stored() {
        let cell = StatusCell::default();
        assert_eq!(cell.load(), Item::fallback_status());

        cell.store(Item::status("Warsaw: 12.3°C", Icon::Sun));
        assert_eq!(cell.load().text, "Warsaw: 12.3°C");
        assert_eq!(cell.load().icon, Icon::Sun);
    }

    #[test]
    fn store_replaces_rather_than_merges() {
        let cell = StatusCell::new(Item::status("old", Icon::Rain));
        cell.store(Item::status("new", Icon::Sun));
        let got = cell.load();
        assert_eq!(got.text, "new");
        assert_eq!(got.icon, Icon::Sun);
    }

    #[test]
    fn concurrent_reads_see_old_or_new_never_torn() {
        let cell = Arc::new(StatusCell::new(Item::status("alpha", Icon::Sun)));
        let barrier = Arc::new(Barrier::new(5));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..10_000 {
                        let got = cell.load();
                        // Text and icon always belong to the same store.
                        match got.text.as_str() {
                            "alpha" => assert_eq!(got.icon, Icon::Sun),
                            "omega" => assert_eq!(got.icon, Icon::Snow),
                            other => panic!("unexpected status text {other:?}"),
                        }
                    }
                })
            })
            .collect();

        barrier.wait();
        for i in 0..1_000 {
            if i % 2 == 0 {
                cell.store(Item::status("omega", Icon::Snow));
            } else {
                cell.store(Item::status("alpha", Icon::Sun));
            }
        }

        for handle in readers {
            handle.join().unwrap();
        }
    }
}
