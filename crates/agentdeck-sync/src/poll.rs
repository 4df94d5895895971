//! Polling schedule and fetch-ordering primitives.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::lock;

/// Monotonic fetch sequence numbers with a last-write-wins commit gate.
///
/// Every fetch calls [`begin`](Self::begin) before issuing its request and
/// [`try_commit`](Self::try_commit) when the response settles. Overlapping
/// fetches may settle in any order; only a response whose sequence number
/// is greater than every previously committed one may be applied, so an
/// older fetch can never overwrite state populated by a newer one.
///
/// [`close`](Self::close) rejects all further commits. A view closes its
/// gate on teardown so in-flight completions are discarded instead of
/// being applied to released state.
#[derive(Debug, Default)]
pub struct FetchSeq {
    next: AtomicU64,
    committed: AtomicU64,
    closed: AtomicBool,
}

impl FetchSeq {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next fetch sequence number.
    pub fn begin(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Attempt to commit a settled fetch. Returns false when the gate is
    /// closed or a newer fetch already committed; the caller must then
    /// discard its result.
    pub fn try_commit(&self, seq: u64) -> bool {
        if self.closed.load(Ordering::Acquire) {
            return false;
        }
        let mut current = self.committed.load(Ordering::Acquire);
        loop {
            if seq <= current {
                return false;
            }
            match self.committed.compare_exchange(
                current,
                seq,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Accept commits again after a [`close`](Self::close).
    pub fn open(&self) {
        self.closed.store(false, Ordering::Release);
    }

    /// Reject all further commits.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Whether the gate currently rejects commits.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

/// Drives a refresh operation on a fixed period.
///
/// [`start`](Self::start) invokes the refresh once immediately, then once
/// per interval. Each invocation is spawned fire-and-forget: a slow
/// refresh never delays the schedule, and overlapping invocations are
/// tolerated because state swaps go through a [`FetchSeq`].
#[derive(Debug, Default)]
pub struct Poller {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the schedule.
    pub fn start<F, Fut>(&self, interval: Duration, mut refresh: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                tokio::spawn(refresh());
            }
        });
        if let Some(previous) = lock(&self.handle).replace(handle) {
            previous.abort();
        }
    }

    /// Cancel the schedule. Idempotent; safe to call when never started.
    /// Does not cancel already-spawned refresh invocations - those are
    /// discarded at commit time via the view's [`FetchSeq`].
    pub fn stop(&self) {
        if let Some(handle) = lock(&self.handle).take() {
            handle.abort();
        }
    }

    /// Whether a schedule is currently installed.
    pub fn is_running(&self) -> bool {
        lock(&self.handle).is_some()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    #[test]
    fn test_seq_monotonic() {
        let seq = FetchSeq::new();
        assert_eq!(seq.begin(), 1);
        assert_eq!(seq.begin(), 2);
        assert_eq!(seq.begin(), 3);
    }

    #[test]
    fn test_seq_last_write_wins() {
        let seq = FetchSeq::new();
        let older = seq.begin();
        let newer = seq.begin();
        // newer settles first
        assert!(seq.try_commit(newer));
        assert!(!seq.try_commit(older));
    }

    #[test]
    fn test_seq_in_order_commits() {
        let seq = FetchSeq::new();
        let first = seq.begin();
        let second = seq.begin();
        assert!(seq.try_commit(first));
        assert!(seq.try_commit(second));
    }

    #[test]
    fn test_seq_closed_rejects_commits() {
        let seq = FetchSeq::new();
        let pending = seq.begin();
        seq.close();
        assert!(!seq.try_commit(pending));

        seq.open();
        let fresh = seq.begin();
        assert!(seq.try_commit(fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_fires_immediately_then_periodically() {
        let count = Arc::new(AtomicUsize::new(0));
        let poller = Poller::new();
        let counter = count.clone();
        poller.start(Duration::from_millis(100), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_stop_cancels_schedule() {
        let count = Arc::new(AtomicUsize::new(0));
        let poller = Poller::new();
        let counter = count.clone();
        poller.start(Duration::from_millis(100), move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(150)).await;
        poller.stop();
        let after_stop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_poller_stop_is_idempotent() {
        let poller = Poller::new();
        poller.stop();
        poller.stop();
        assert!(!poller.is_running());

        poller.start(Duration::from_secs(60), || async {});
        assert!(poller.is_running());
        poller.stop();
        poller.stop();
        assert!(!poller.is_running());
    }
}
