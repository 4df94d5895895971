//! The consuming interface over the remote task/agent store.

use agentdeck_core::{Agent, AgentId, AgentMetrics, TaskRecord, TaskRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Query parameters for a paged task listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    /// Restrict the listing to one agent; `None` lists across all agents.
    pub agent_id: Option<AgentId>,

    /// Maximum number of records to return.
    pub limit: u32,

    /// Number of records to skip from the start of the collection.
    pub offset: u64,
}

/// One page of a task listing, with the total size of the full collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskPage {
    pub tasks: Vec<TaskRecord>,
    pub total: u64,
}

/// Operations the dashboard consumes from the remote store.
///
/// The dashboard never redefines these; it is a read-mostly consumer of a
/// JSON-over-HTTP contract assumed stable. The trait seam exists so the
/// sync layer can be exercised against an in-process fake in tests.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// All known agents.
    async fn list_agents(&self) -> Result<Vec<Agent>, ClientError>;

    /// Aggregate task counts for one agent.
    async fn agent_metrics(&self, agent_id: &AgentId) -> Result<AgentMetrics, ClientError>;

    /// One page of tasks matching the query.
    async fn list_tasks(&self, query: &TaskQuery) -> Result<TaskPage, ClientError>;

    /// Submit a new task. Fails with a human-readable message on
    /// validation or transport failure.
    async fn execute_task(&self, request: &TaskRequest) -> Result<TaskRecord, ClientError>;

    /// The most recent tasks across all agents. No paging; always the
    /// `limit` most recent.
    async fn recent_activity(&self, limit: u32) -> Result<Vec<TaskRecord>, ClientError>;
}
