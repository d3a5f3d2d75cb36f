//! Debounced commits into the history ring.
//!
//! A drag gesture produces dozens of position commands in a burst. Each one
//! calls [`DebouncedHistory::commit`], which cancels the pending timer and
//! schedules a new one; only the last snapshot of the burst lands in the
//! ring, once the burst has been quiet for the configured delay.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::HistoryConfig;
use crate::types::PositionSnapshot;
use super::stack::HistoryStack;

/// Snapshot waiting for its timer, tagged with the commit generation that
/// scheduled it.
#[derive(Debug)]
struct Pending {
    generation: u64,
    snapshot: PositionSnapshot,
}

/// History ring plus a cancellable debounce timer.
///
/// The timer task is owned by this struct and aborted on drop, so a late
/// timer never writes into a disposed session.
#[derive(Debug)]
pub struct DebouncedHistory {
    stack: Arc<Mutex<HistoryStack>>,
    pending: Arc<Mutex<Option<Pending>>>,
    timer: Option<JoinHandle<()>>,
    generation: u64,
    delay: Duration,
    runtime: Handle,
}

impl DebouncedHistory {
    /// Create an empty history whose timers run on `runtime`.
    pub fn new(config: &HistoryConfig, runtime: Handle) -> Self {
        Self {
            stack: Arc::new(Mutex::new(HistoryStack::new(config.capacity))),
            pending: Arc::new(Mutex::new(None)),
            timer: None,
            generation: 0,
            delay: config.debounce(),
            runtime,
        }
    }

    /// Schedule `snapshot` to be pushed once commits have been quiet for the
    /// debounce delay. Replaces any snapshot still waiting.
    pub fn commit(&mut self, snapshot: PositionSnapshot) {
        self.cancel_timer();
        self.generation += 1;

        if self.delay.is_zero() {
            *self.pending.lock() = None;
            self.stack.lock().push(snapshot);
            return;
        }

        let generation = self.generation;
        *self.pending.lock() = Some(Pending { generation, snapshot });

        let stack = Arc::clone(&self.stack);
        let pending = Arc::clone(&self.pending);
        let delay = self.delay;
        self.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // The pending slot stays locked until the push lands so a
            // concurrent flush never observes an empty slot and a stale stack.
            let mut slot = pending.lock();
            if slot.as_ref().is_some_and(|p| p.generation == generation) {
                if let Some(p) = slot.take() {
                    let mut stack = stack.lock();
                    stack.push(p.snapshot);
                    tracing::trace!(entries = stack.len(), index = stack.index(), "History commit");
                }
            }
        }));
    }

    /// Push a waiting snapshot now instead of at its deadline.
    ///
    /// Returns true if something was pending.
    pub fn flush(&mut self) -> bool {
        self.cancel_timer();
        // Lock order is always pending, then stack.
        let mut slot = self.pending.lock();
        match slot.take() {
            Some(p) => {
                self.stack.lock().push(p.snapshot);
                true
            }
            None => false,
        }
    }

    /// True while a commit is waiting for its timer.
    pub fn has_pending(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Step back. Flushes a pending commit first so the gesture that just
    /// ended is the one undone.
    pub fn undo(&mut self) -> Option<PositionSnapshot> {
        self.flush();
        self.stack.lock().undo().cloned()
    }

    /// Step forward. Flushes a pending commit first, which truncates the
    /// redo branch.
    pub fn redo(&mut self) -> Option<PositionSnapshot> {
        self.flush();
        self.stack.lock().redo().cloned()
    }

    /// The entry the pointer is on. Pending commits are not included.
    pub fn current(&self) -> Option<PositionSnapshot> {
        self.stack.lock().current().cloned()
    }

    /// Number of committed entries.
    pub fn len(&self) -> usize {
        self.stack.lock().len()
    }

    /// True if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.stack.lock().is_empty()
    }

    /// Current pointer.
    pub fn index(&self) -> usize {
        self.stack.lock().index()
    }

    /// True if `undo` would move the pointer.
    pub fn can_undo(&self) -> bool {
        self.stack.lock().can_undo()
    }

    /// True if `redo` would move the pointer.
    pub fn can_redo(&self) -> bool {
        self.stack.lock().can_redo()
    }

    /// Apply a new capacity and debounce delay.
    ///
    /// A commit already waiting keeps its original deadline; the new delay
    /// applies from the next commit.
    pub fn reconfigure(&mut self, config: &HistoryConfig) {
        self.delay = config.debounce();
        self.stack.lock().set_capacity(config.capacity);
    }

    /// Drop all entries and any pending commit.
    pub fn clear(&mut self) {
        self.cancel_timer();
        *self.pending.lock() = None;
        self.stack.lock().clear();
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for DebouncedHistory {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodePosition;

    fn snap(x: f64) -> PositionSnapshot {
        PositionSnapshot::new().with("n", NodePosition::free(x, 0.0))
    }

    fn history() -> DebouncedHistory {
        DebouncedHistory::new(&HistoryConfig::default(), Handle::current())
    }

    async fn settle(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_lands_after_delay() {
        let mut h = history();
        h.commit(snap(1.0));
        assert!(h.is_empty());
        assert!(h.has_pending());

        settle(350).await;
        assert_eq!(h.len(), 1);
        assert!(!h.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_coalesces_last_wins() {
        let mut h = history();
        h.commit(snap(1.0));
        settle(100).await;
        h.commit(snap(2.0));
        settle(100).await;
        h.commit(snap(3.0));
        settle(350).await;

        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(snap(3.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_gestures_are_separate_entries() {
        let mut h = history();
        h.commit(snap(1.0));
        settle(400).await;
        h.commit(snap(2.0));
        settle(400).await;
        assert_eq!(h.len(), 2);
        assert_eq!(h.undo(), Some(snap(1.0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let mut h = history();
        let stack = Arc::clone(&h.stack);
        h.commit(snap(1.0));
        drop(h);

        settle(500).await;
        assert!(stack.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_flushes_pending() {
        let mut h = history();
        h.commit(snap(1.0));
        settle(400).await;
        h.commit(snap(2.0));

        assert_eq!(h.undo(), Some(snap(1.0)));
        assert_eq!(h.len(), 2);
        settle(400).await;
        assert_eq!(h.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_flush_racing_timer_never_loses_commit() {
        let config = HistoryConfig { capacity: 1000, debounce_ms: 1 };
        let mut h = DebouncedHistory::new(&config, Handle::current());
        for i in 0..200u64 {
            h.commit(snap(i as f64));
            // Land near the deadline so the timer often fires mid-flush.
            std::thread::sleep(Duration::from_micros(900 + (i % 5) * 50));
            h.flush();
            assert_eq!(h.current(), Some(snap(i as f64)), "commit {i} missing after flush");
            assert_eq!(h.len(), i as usize + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconfigure_changes_delay_and_capacity() {
        let mut h = history();
        for i in 0..5 {
            h.commit(snap(i as f64));
            h.flush();
        }
        h.reconfigure(&HistoryConfig { capacity: 2, debounce_ms: 50 });
        assert_eq!(h.len(), 2);
        assert_eq!(h.current(), Some(snap(4.0)));

        h.commit(snap(9.0));
        settle(60).await;
        assert_eq!(h.current(), Some(snap(9.0)));
        assert_eq!(h.len(), 2);
    }

    #[tokio::test]
    async fn test_zero_delay_commits_immediately() {
        let config = HistoryConfig { capacity: 100, debounce_ms: 0 };
        let mut h = DebouncedHistory::new(&config, Handle::current());
        h.commit(snap(1.0));
        assert_eq!(h.len(), 1);
    }

    #[tokio::test]
    async fn test_capacity_after_many_commits() {
        let config = HistoryConfig { capacity: 100, debounce_ms: 0 };
        let mut h = DebouncedHistory::new(&config, Handle::current());
        for i in 0..500 {
            h.commit(snap(i as f64));
        }
        assert_eq!(h.len(), 100);
        assert_eq!(h.current(), Some(snap(499.0)));
    }
}
