//! Agent identity and metrics types.

use crate::{AgentId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A logical worker type that executes tasks (e.g. sales, support, blog).
///
/// Read-only from the dashboard's perspective; looked up by `kind` to
/// resolve the id used to scope task queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique agent identifier.
    pub id: AgentId,

    /// Agent kind, the lookup key for scoping queries.
    #[serde(rename = "type")]
    pub kind: String,

    /// Human-readable name.
    pub name: String,
}

impl Agent {
    /// Create a new Agent.
    pub fn new(id: AgentId, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Aggregate task counts for one agent, as reported by the remote store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetrics {
    /// Total tasks ever submitted to this agent.
    pub total_tasks: u64,

    /// Task counts keyed by lifecycle status.
    #[serde(default)]
    pub status_counts: HashMap<TaskStatus, u64>,
}

impl AgentMetrics {
    /// Count for one status, zero when the store reported none.
    pub fn count(&self, status: TaskStatus) -> u64 {
        self.status_counts.get(&status).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_kind_wire_name() {
        let agent: Agent =
            serde_json::from_value(json!({"id": "a1", "type": "blog", "name": "Blog Agent"}))
                .unwrap();
        assert_eq!(agent.kind, "blog");
    }

    #[test]
    fn test_metrics_missing_status_counts_as_zero() {
        let metrics: AgentMetrics = serde_json::from_value(json!({
            "totalTasks": 3,
            "statusCounts": {"completed": 2, "failed": 1}
        }))
        .unwrap();
        assert_eq!(metrics.count(TaskStatus::Completed), 2);
        assert_eq!(metrics.count(TaskStatus::Pending), 0);
    }
}
