//! In-process fake of the remote store for sync-layer tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use agentdeck_client::{ClientError, TaskPage, TaskQuery, TaskStore};
use agentdeck_core::{Agent, AgentId, AgentMetrics, TaskRecord, TaskRequest};
use async_trait::async_trait;
use chrono::TimeZone;
use serde_json::json;

use crate::lock;

/// Deterministic stand-in for the remote store. Listings slice an
/// in-memory collection; optional per-call delays and a failure switch
/// drive the ordering and error-path tests.
pub(crate) struct FakeStore {
    agents: Mutex<Vec<Agent>>,
    metrics: Mutex<HashMap<AgentId, AgentMetrics>>,
    tasks: Mutex<Vec<TaskRecord>>,
    activity: Mutex<Vec<TaskRecord>>,
    delays: Mutex<VecDeque<Duration>>,
    failing: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            agents: Mutex::new(Vec::new()),
            metrics: Mutex::new(HashMap::new()),
            tasks: Mutex::new(Vec::new()),
            activity: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// `count` pending tasks for agent "agent-1" with staggered creation
    /// times, newest last: t1, t2, ...
    pub fn task_batch(count: usize) -> Vec<TaskRecord> {
        let base = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        (1..=count)
            .map(|i| {
                TaskRecord::new(AgentId::new("agent-1"), "generate_outline", json!({"n": i}))
                    .with_id(format!("t{i}"))
                    .with_created_at(Some(base + chrono::Duration::seconds(i as i64)))
            })
            .collect()
    }

    pub fn add_agent(&self, agent: Agent) {
        lock(&self.agents).push(agent);
    }

    pub fn clear_agents(&self) {
        lock(&self.agents).clear();
    }

    pub fn set_metrics(&self, agent_id: AgentId, metrics: AgentMetrics) {
        lock(&self.metrics).insert(agent_id, metrics);
    }

    pub fn set_tasks(&self, tasks: Vec<TaskRecord>) {
        *lock(&self.tasks) = tasks;
    }

    pub fn set_activity(&self, tasks: Vec<TaskRecord>) {
        *lock(&self.activity) = tasks;
    }

    /// Delay the next listing call by `delay` (FIFO per call).
    pub fn queue_delay(&self, delay: Duration) {
        lock(&self.delays).push_back(delay);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ClientError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClientError::Api {
                status: 500,
                message: "store unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn maybe_delay(&self) {
        let delay = lock(&self.delays).pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl TaskStore for FakeStore {
    async fn list_agents(&self) -> Result<Vec<Agent>, ClientError> {
        self.check_available()?;
        Ok(lock(&self.agents).clone())
    }

    async fn agent_metrics(&self, agent_id: &AgentId) -> Result<AgentMetrics, ClientError> {
        self.check_available()?;
        Ok(lock(&self.metrics)
            .get(agent_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskPage, ClientError> {
        self.check_available()?;
        self.maybe_delay().await;

        let matching: Vec<TaskRecord> = lock(&self.tasks)
            .iter()
            .filter(|t| match &query.agent_id {
                Some(agent_id) => &t.agent_id == agent_id,
                None => true,
            })
            .cloned()
            .collect();

        let total = matching.len() as u64;
        let tasks = matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok(TaskPage { tasks, total })
    }

    async fn execute_task(&self, request: &TaskRequest) -> Result<TaskRecord, ClientError> {
        self.check_available()?;

        let agent_id = lock(&self.agents)
            .iter()
            .find(|a| a.kind == request.agent_kind)
            .map(|a| a.id.clone())
            .ok_or_else(|| ClientError::Api {
                status: 400,
                message: format!("no agent of type {}", request.agent_kind),
            })?;

        let record = TaskRecord::new(agent_id, request.action.clone(), request.input.clone());
        lock(&self.tasks).insert(0, record.clone());
        lock(&self.activity).insert(0, record.clone());
        Ok(record)
    }

    async fn recent_activity(&self, limit: u32) -> Result<Vec<TaskRecord>, ClientError> {
        self.check_available()?;
        self.maybe_delay().await;

        let mut activity = lock(&self.activity).clone();
        activity.truncate(limit as usize);
        Ok(activity)
    }
}

/// A completed task whose output nests the body under "response".
pub(crate) fn completed_task(id: &str, title: &str) -> TaskRecord {
    TaskRecord::new(AgentId::new("agent-1"), "generate_outline", json!({}))
        .with_id(id)
        .with_output(json!({"response": {"title": title}}))
}
