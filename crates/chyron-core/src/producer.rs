//! Background fetch loop feeding the ticker.
//!
//! The producer owns the only thread in the engine. On a fixed interval it
//! refreshes the status cell and pushes a batch of headlines into the
//! hand-off channel; the consumer drains both from the render path without
//! ever blocking. The interval sleep sits on a condition variable so a stop
//! request wakes it immediately instead of waiting out the timer.
//!
//! # Failure modes
//!
//! - A failed status fetch stores the fallback status (replacing whatever
//!   was cached) and the loop continues on schedule.
//! - A failed item fetch becomes an empty batch; no retry until the next
//!   interval.
//! - A dropped consumer (receiver gone) ends the loop.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex};
use std::thread;
use std::time::Duration;

use crate::config::TickerConfig;
use crate::item::Item;
use crate::source::Source;
use crate::status::StatusCell;

/// Wakeable stop flag checked by the fetch loop.
#[derive(Clone)]
pub(crate) struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    pub(crate) fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: inner.clone(),
        };
        let trigger = StopTrigger { inner };
        (signal, trigger)
    }

    /// Whether a stop has been requested.
    pub(crate) fn is_stopped(&self) -> bool {
        let (lock, _) = &*self.inner;
        *lock.lock().unwrap()
    }

    /// Sleep until stopped or `duration` elapses.
    ///
    /// Returns `true` if stopped, `false` on timeout.
    pub(crate) fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        if *stopped {
            return true;
        }
        let result = cvar.wait_timeout(stopped, duration).unwrap();
        stopped = result.0;
        *stopped
    }
}

/// Owner side of a [`StopSignal`].
pub(crate) struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    pub(crate) fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap();
        *stopped = true;
        cvar.notify_all();
    }
}

/// Consumer-side endpoints of the producer hand-off: the headline channel
/// and the shared status cell.
#[derive(Debug)]
pub struct FeedHandle {
    pub(crate) items: mpsc::Receiver<Item>,
    pub(crate) status: Arc<StatusCell>,
}

impl FeedHandle {
    /// Endpoints without a background thread.
    ///
    /// The caller keeps the sender and the status cell and feeds them on its
    /// own schedule. Used by tests and by hosts that cannot spawn threads.
    pub fn detached() -> (mpsc::Sender<Item>, Arc<StatusCell>, FeedHandle) {
        let (sender, receiver) = mpsc::channel();
        let status = Arc::new(StatusCell::default());
        let handle = FeedHandle {
            items: receiver,
            status: Arc::clone(&status),
        };
        (sender, status, handle)
    }
}

/// Handle to the background fetch thread.
///
/// [`Producer::stop`] signals the loop and joins it; at most one in-flight
/// fetch of each kind is wasted. Dropping without `stop` signals the loop
/// but does not wait for it.
pub struct Producer {
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl Producer {
    /// Spawn the fetch thread and return it with the consumer endpoints.
    ///
    /// Uses `config.fetch_interval` and `config.max_items_per_fetch`; the
    /// config is assumed validated (see [`TickerConfig::validate`]). The
    /// first fetch cycle runs immediately so the ticker has content as soon
    /// as the source answers, and each later cycle follows one interval
    /// after the previous one completed.
    pub fn spawn<S>(source: S, config: &TickerConfig) -> (Producer, FeedHandle)
    where
        S: Source + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let status = Arc::new(StatusCell::default());
        let handle = FeedHandle {
            items: receiver,
            status: Arc::clone(&status),
        };

        let (signal, trigger) = StopSignal::new();
        let interval = config.fetch_interval;
        let limit = config.max_items_per_fetch;
        let thread = thread::spawn(move || {
            run_fetch_loop(source, &sender, &status, interval, limit, &signal);
        });

        (
            Producer {
                trigger,
                thread: Some(thread),
            },
            handle,
        )
    }

    /// Signal the fetch loop to stop and join the thread.
    pub fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Producer {
    fn drop(&mut self) {
        self.trigger.stop();
        // Don't join in drop: an in-flight fetch may hold the thread for
        // up to the source's own timeout.
    }
}

fn run_fetch_loop<S: Source>(
    mut source: S,
    sender: &mpsc::Sender<Item>,
    status: &StatusCell,
    interval: Duration,
    limit: usize,
    signal: &StopSignal,
) {
    loop {
        if !fetch_cycle(&mut source, sender, status, limit) {
            tracing::debug!(target: "chyron.producer", "consumer gone, fetch loop exiting");
            return;
        }
        if signal.wait_timeout(interval) {
            tracing::debug!(target: "chyron.producer", "stop requested, fetch loop exiting");
            return;
        }
    }
}

/// One producer cycle: refresh the status, then push a headline batch.
///
/// Returns `false` once the consumer side of the channel is gone.
fn fetch_cycle<S: Source>(
    source: &mut S,
    sender: &mpsc::Sender<Item>,
    status: &StatusCell,
    limit: usize,
) -> bool {
    match source.fetch_status() {
        Ok((text, icon)) => status.store(Item::status(text, icon)),
        Err(error) => {
            tracing::warn!(
                target: "chyron.producer",
                error = %error,
                "status fetch failed, storing fallback"
            );
            status.store(Item::fallback_status());
        }
    }

    let mut batch = match source.fetch_items(limit) {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(
                target: "chyron.producer",
                error = %error,
                "item fetch failed, skipping batch"
            );
            Vec::new()
        }
    };
    batch.truncate(limit);

    // The source lists newest first; enqueue oldest first so display order
    // follows publication order.
    for text in batch.into_iter().rev() {
        if text.is_empty() {
            continue;
        }
        if sender.send(Item::headline(text)).is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    use super::*;
    use crate::item::{Icon, ItemKind};
    use crate::source::SourceError;

    struct ScriptedSource {
        batch: Vec<String>,
        item_calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl ScriptedSource {
        fn new(batch: &[&str]) -> Self {
            Self {
                batch: batch.iter().map(|s| s.to_string()).collect(),
                item_calls: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        fn failing() -> Self {
            let mut source = Self::new(&[]);
            source.fail = true;
            source
        }
    }

    impl Source for ScriptedSource {
        fn fetch_items(&mut self, _limit: usize) -> Result<Vec<String>, SourceError> {
            self.item_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err("feed unreachable".into());
            }
            Ok(self.batch.clone())
        }

        fn fetch_status(&mut self) -> Result<(String, Icon), SourceError> {
            if self.fail {
                return Err("status unreachable".into());
            }
            Ok(("sunny".to_string(), Icon::Sun))
        }
    }

    fn config_with_interval(interval: Duration) -> TickerConfig {
        TickerConfig::new().fetch_interval(interval)
    }

    #[test]
    fn stop_signal_starts_false() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.is_stopped());
    }

    #[test]
    fn stop_signal_becomes_true_after_trigger() {
        let (signal, trigger) = StopSignal::new();
        trigger.stop();
        assert!(signal.is_stopped());
        assert!(signal.wait_timeout(Duration::from_millis(100)));
    }

    #[test]
    fn stop_signal_wait_returns_false_on_timeout() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn first_cycle_runs_immediately_and_enqueues_oldest_first() {
        // A one-minute interval proves the batch came from cycle zero.
        let source = ScriptedSource::new(&["newest", "middle", "oldest"]);
        let (producer, feed) = Producer::spawn(source, &config_with_interval(Duration::from_secs(60)));

        let first = feed.items.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = feed.items.recv_timeout(Duration::from_secs(5)).unwrap();
        let third = feed.items.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.text, "oldest");
        assert_eq!(second.text, "middle");
        assert_eq!(third.text, "newest");
        assert_eq!(first.kind, ItemKind::Headline);
        assert_eq!(first.icon, Icon::Headline);

        assert_eq!(feed.status.load().text, "sunny");
        producer.stop();
    }

    #[test]
    fn stop_wakes_a_sleeping_producer_promptly() {
        let source = ScriptedSource::new(&["only"]);
        let (producer, feed) = Producer::spawn(source, &config_with_interval(Duration::from_secs(60)));

        // Cycle zero has run once the first item shows up.
        feed.items.recv_timeout(Duration::from_secs(5)).unwrap();

        let start = Instant::now();
        producer.stop();
        assert!(
            start.elapsed() < Duration::from_secs(5),
            "stop should interrupt the interval sleep, took {:?}",
            start.elapsed()
        );
    }

    #[test]
    fn failures_store_fallback_and_keep_the_loop_alive() {
        let source = ScriptedSource::failing();
        let calls = Arc::clone(&source.item_calls);
        let (producer, feed) = Producer::spawn(source, &config_with_interval(Duration::from_millis(10)));

        // Wait for at least two cycles; each one failed and was absorbed.
        let deadline = Instant::now() + Duration::from_secs(5);
        while calls.load(Ordering::SeqCst) < 2 {
            assert!(Instant::now() < deadline, "producer stopped cycling");
            thread::sleep(Duration::from_millis(5));
        }

        assert_eq!(feed.status.load(), Item::fallback_status());
        assert!(feed.items.try_recv().is_err());
        producer.stop();
    }

    #[test]
    fn empty_strings_are_not_enqueued() {
        let source = ScriptedSource::new(&["real", ""]);
        let (producer, feed) = Producer::spawn(source, &config_with_interval(Duration::from_secs(60)));

        let only = feed.items.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(only.text, "real");
        assert!(feed.items.try_recv().is_err());
        producer.stop();
    }

    #[test]
    fn batch_is_capped_at_the_configured_limit() {
        let source = ScriptedSource::new(&["a", "b", "c", "d"]);
        let config = config_with_interval(Duration::from_secs(60)).max_items_per_fetch(2);
        let (producer, feed) = Producer::spawn(source, &config);

        // Cap keeps the newest two, enqueued oldest first.
        let first = feed.items.recv_timeout(Duration::from_secs(5)).unwrap();
        let second = feed.items.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.text, "b");
        assert_eq!(second.text, "a");
        assert!(feed.items.try_recv().is_err());
        producer.stop();
    }

    #[test]
    fn loop_exits_when_consumer_is_dropped() {
        let source = ScriptedSource::new(&["x"]);
        let calls = Arc::clone(&source.item_calls);
        let (producer, feed) = Producer::spawn(source, &config_with_interval(Duration::from_millis(5)));

        drop(feed);

        // The next send hits a closed channel and the loop winds down; the
        // call counter stops moving shortly after.
        thread::sleep(Duration::from_millis(100));
        let settled = calls.load(Ordering::SeqCst);
        thread::sleep(Duration::from_millis(100));
        assert_eq!(calls.load(Ordering::SeqCst), settled);
        producer.stop();
    }

    #[test]
    fn detached_handle_feeds_without_a_thread() {
        let (sender, status, feed) = FeedHandle::detached();
        sender.send(Item::headline("manual")).unwrap();
        status.store(Item::status("fed by hand", Icon::Cloud));

        assert_eq!(feed.items.try_recv().unwrap().text, "manual");
        assert_eq!(feed.status.load().text, "fed by hand");
    }
}
