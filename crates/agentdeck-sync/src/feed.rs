//! Global activity feed view session: the cross-agent recent-activity
//! collection, projected into filterable activity-log entries.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agentdeck_client::TaskStore;
use agentdeck_core::{TaskId, TaskRecord};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::lock;
use crate::poll::{FetchSeq, Poller};
use crate::project::{activity_entries, ActivityEntry};
use crate::select::{last_activity, ActivityFilter, Selection};

/// Cloneable rendering snapshot of the feed. `entries` already has the
/// filter applied; `total_entries` counts the unfiltered projection.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    pub entries: Vec<ActivityEntry>,
    pub total_entries: usize,
    pub filter: ActivityFilter,
    pub selected: Option<TaskId>,
    pub last_activity: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl FeedSnapshot {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            total_entries: 0,
            filter: ActivityFilter::default(),
            selected: None,
            last_activity: None,
            last_error: None,
        }
    }
}

#[derive(Default)]
struct FeedState {
    records: Vec<TaskRecord>,
    entries: Vec<ActivityEntry>,
    filter: ActivityFilter,
    selection: Selection,
    last_activity: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// State owner for the global activity view.
///
/// The feed is an independent read-only collection: no paging, always the
/// N most recent tasks across all agents, with no ordering guarantee
/// relative to per-agent fetches.
pub struct ActivityFeed {
    store: Arc<dyn TaskStore>,
    limit: u32,
    seq: Arc<FetchSeq>,
    state: Arc<Mutex<FeedState>>,
    poller: Poller,
}

impl ActivityFeed {
    pub fn new(store: Arc<dyn TaskStore>, limit: u32) -> Self {
        Self {
            store,
            limit,
            seq: Arc::new(FetchSeq::new()),
            state: Arc::new(Mutex::new(FeedState::default())),
            poller: Poller::new(),
        }
    }

    /// Begin polling: one refresh immediately, then one per `interval`.
    pub fn start(&self, interval: Duration) {
        info!(
            limit = self.limit,
            interval_ms = interval.as_millis() as u64,
            "starting activity polling"
        );
        self.seq.open();
        let store = self.store.clone();
        let limit = self.limit;
        let seq = self.seq.clone();
        let state = self.state.clone();
        self.poller.start(interval, move || {
            run_cycle(store.clone(), limit, seq.clone(), state.clone())
        });
    }

    /// Stop polling and discard any in-flight fetch results. Idempotent.
    pub fn stop(&self) {
        self.seq.close();
        self.poller.stop();
    }

    /// Run one refresh outside the schedule (manual refresh).
    pub async fn refresh_now(&self) {
        run_cycle(
            self.store.clone(),
            self.limit,
            self.seq.clone(),
            self.state.clone(),
        )
        .await;
    }

    pub fn snapshot(&self) -> FeedSnapshot {
        let state = lock(&self.state);
        FeedSnapshot {
            entries: state.filter.apply(&state.entries),
            total_entries: state.entries.len(),
            filter: state.filter,
            selected: state.selection.selected().cloned(),
            last_activity: state.last_activity,
            last_error: state.last_error.clone(),
        }
    }

    pub fn set_filter(&self, filter: ActivityFilter) {
        lock(&self.state).filter = filter;
    }

    /// Advance to the next filter in display order.
    pub fn cycle_filter(&self) -> ActivityFilter {
        let mut state = lock(&self.state);
        state.filter = state.filter.next();
        state.filter
    }

    pub fn select(&self, id: Option<TaskId>) {
        let mut state = lock(&self.state);
        match id {
            Some(id) => state.selection.select(id),
            None => state.selection.clear(),
        }
    }
}

/// One polling cycle: fetch, then swap records, projection, selection and
/// the derived last-activity value as a unit.
async fn run_cycle(
    store: Arc<dyn TaskStore>,
    limit: u32,
    seq: Arc<FetchSeq>,
    state: Arc<Mutex<FeedState>>,
) {
    let seq_no = seq.begin();
    match store.recent_activity(limit).await {
        Ok(records) => {
            if !seq.try_commit(seq_no) {
                debug!(seq = seq_no, "discarding stale activity fetch");
                return;
            }
            let mut st = lock(&state);
            st.entries = activity_entries(&records);
            st.selection.retain_present(&records);
            st.last_activity = last_activity(&records);
            st.records = records;
            st.last_error = None;
        }
        Err(err) => {
            if seq.is_closed() {
                return;
            }
            warn!(error = %err, "activity fetch failed; keeping previous snapshot");
            lock(&state).last_error = Some(err.to_string());
        }
    }
}
