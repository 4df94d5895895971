//! Agent console view session: metrics plus the paged task queue for one
//! agent kind, refreshed on a schedule.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use agentdeck_client::{ClientError, TaskStore};
use agentdeck_core::{Agent, AgentMetrics, TaskId, TaskRecord, TaskRequest};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::lock;
use crate::pager::{TaskPager, TaskWindow};
use crate::poll::{FetchSeq, Poller};
use crate::project::{
    conversation_entries, log_panel, ConversationEntry, LogPanelEntry, LOG_PANEL_CAP,
};
use crate::select::{last_activity, Selection};

/// Cloneable rendering snapshot of the console.
#[derive(Debug, Clone)]
pub struct ConsoleSnapshot {
    /// The resolved agent, or `None` while the scope is not ready.
    pub agent: Option<Agent>,
    pub metrics: Option<AgentMetrics>,
    pub window: TaskWindow,
    pub conversations: Vec<ConversationEntry>,
    pub log_panel: Vec<LogPanelEntry>,
    pub selected: Option<TaskId>,
    pub last_activity: Option<DateTime<Utc>>,
    /// Most recent swallowed poll failure, cleared by the next good cycle.
    pub last_error: Option<String>,
}

impl ConsoleSnapshot {
    pub fn empty(page_size: u32) -> Self {
        Self {
            agent: None,
            metrics: None,
            window: TaskWindow::empty(page_size),
            conversations: Vec::new(),
            log_panel: Vec::new(),
            selected: None,
            last_activity: None,
            last_error: None,
        }
    }

    /// Submission and scoped queries need a resolved agent.
    pub fn is_ready(&self) -> bool {
        self.agent.is_some()
    }
}

#[derive(Default)]
struct ConsoleState {
    agent: Option<Agent>,
    metrics: Option<AgentMetrics>,
    selection: Selection,
    last_activity: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// State owner for one agent's console view.
///
/// Owns its stores exclusively; created on view mount, `start`ed with the
/// poll interval, and `stop`ped on unmount. Stopping closes the fetch gate
/// first, so a fetch that settles after teardown is discarded rather than
/// applied to released state.
pub struct AgentConsole {
    store: Arc<dyn TaskStore>,
    agent_kind: String,
    seq: Arc<FetchSeq>,
    pager: Arc<TaskPager>,
    state: Arc<Mutex<ConsoleState>>,
    poller: Poller,
}

impl AgentConsole {
    pub fn new(store: Arc<dyn TaskStore>, agent_kind: impl Into<String>, page_size: u32) -> Self {
        let seq = Arc::new(FetchSeq::new());
        let pager = Arc::new(TaskPager::new(store.clone(), seq.clone(), page_size));
        Self {
            store,
            agent_kind: agent_kind.into(),
            seq,
            pager,
            state: Arc::new(Mutex::new(ConsoleState::default())),
            poller: Poller::new(),
        }
    }

    /// Begin polling: one refresh immediately, then one per `interval`.
    pub fn start(&self, interval: Duration) {
        info!(
            agent_kind = %self.agent_kind,
            interval_ms = interval.as_millis() as u64,
            "starting console polling"
        );
        self.seq.open();
        let store = self.store.clone();
        let kind = self.agent_kind.clone();
        let seq = self.seq.clone();
        let pager = self.pager.clone();
        let state = self.state.clone();
        self.poller.start(interval, move || {
            run_cycle(
                store.clone(),
                kind.clone(),
                seq.clone(),
                pager.clone(),
                state.clone(),
            )
        });
    }

    /// Stop polling and discard any in-flight fetch results. Idempotent.
    pub fn stop(&self) {
        self.seq.close();
        self.poller.stop();
    }

    /// Run one full refresh cycle outside the schedule (manual refresh).
    pub async fn refresh_now(&self) {
        run_cycle(
            self.store.clone(),
            self.agent_kind.clone(),
            self.seq.clone(),
            self.pager.clone(),
            self.state.clone(),
        )
        .await;
    }

    /// Current state for rendering. Projections are regenerated from the
    /// cached records on every call.
    pub fn snapshot(&self) -> ConsoleSnapshot {
        let state = lock(&self.state);
        let window = self.pager.window_guard().clone();
        ConsoleSnapshot {
            agent: state.agent.clone(),
            metrics: state.metrics.clone(),
            conversations: conversation_entries(&window.items),
            log_panel: log_panel(&window.items, LOG_PANEL_CAP),
            selected: state.selection.selected().cloned(),
            last_activity: state.last_activity,
            last_error: state.last_error.clone(),
            window,
        }
    }

    pub fn select(&self, id: Option<TaskId>) {
        let mut state = lock(&self.state);
        match id {
            Some(id) => state.selection.select(id),
            None => state.selection.clear(),
        }
    }

    pub async fn next_page(&self) -> Result<(), ClientError> {
        self.pager.next().await?;
        self.reconcile();
        Ok(())
    }

    pub async fn previous_page(&self) -> Result<(), ClientError> {
        self.pager.previous().await?;
        self.reconcile();
        Ok(())
    }

    /// Submit a new task, then reload page 1 so the acknowledged record is
    /// visible. No optimistic local insert: the store's record is the
    /// canonical one.
    pub async fn submit(&self, request: TaskRequest) -> Result<TaskRecord, ClientError> {
        if lock(&self.state).agent.is_none() {
            return Err(ClientError::NotReady(format!(
                "no {} agent available",
                self.agent_kind
            )));
        }
        let record = self.store.execute_task(&request).await?;
        self.pager.load(1).await?;
        self.reconcile();
        Ok(record)
    }

    /// Re-resolve selection and derived values after a window change.
    fn reconcile(&self) {
        let mut state = lock(&self.state);
        let window = self.pager.window_guard();
        state.selection.retain_present(&window.items);
        state.last_activity = last_activity(&window.items);
    }
}

struct CycleData {
    agent: Option<Agent>,
    metrics: Option<AgentMetrics>,
    window: TaskWindow,
}

/// One polling cycle. All fetches settle before anything is applied, and
/// the whole cycle is applied (or discarded) as a unit.
async fn run_cycle(
    store: Arc<dyn TaskStore>,
    agent_kind: String,
    seq: Arc<FetchSeq>,
    pager: Arc<TaskPager>,
    state: Arc<Mutex<ConsoleState>>,
) {
    let seq_no = seq.begin();
    match fetch_cycle(store.as_ref(), &agent_kind, &pager).await {
        Ok(cycle) => {
            if !seq.try_commit(seq_no) {
                debug!(seq = seq_no, "discarding stale poll cycle");
                return;
            }
            let mut st = lock(&state);
            let mut window = pager.window_guard();
            *window = cycle.window;
            st.agent = cycle.agent;
            st.metrics = cycle.metrics;
            st.selection.retain_present(&window.items);
            st.last_activity = last_activity(&window.items);
            st.last_error = None;
        }
        Err(err) => {
            if seq.is_closed() {
                return;
            }
            // stale-but-available: keep the previous snapshot
            warn!(error = %err, "poll cycle failed; keeping previous snapshot");
            lock(&state).last_error = Some(err.to_string());
        }
    }
}

async fn fetch_cycle(
    store: &dyn TaskStore,
    agent_kind: &str,
    pager: &TaskPager,
) -> Result<CycleData, ClientError> {
    let agents = store.list_agents().await?;
    let agent = agents.into_iter().find(|a| a.kind == agent_kind);

    let Some(agent) = agent else {
        // scope not ready: dependent UI stays disabled until a later poll
        // resolves it
        pager.replace_scope(None);
        return Ok(CycleData {
            agent: None,
            metrics: None,
            window: TaskWindow::empty(pager.page_size()),
        });
    };

    // a changed scope lands on page 1; a plain refresh keeps the page
    let scope_changed = pager.replace_scope(Some(agent.id.clone()));
    let page = if scope_changed { 1 } else { pager.current_page() };

    let (metrics, window) = tokio::join!(store.agent_metrics(&agent.id), pager.fetch_window(page));

    Ok(CycleData {
        agent: Some(agent),
        metrics: Some(metrics?),
        window: window?,
    })
}
