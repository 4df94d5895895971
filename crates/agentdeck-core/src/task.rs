//! Task record and submission request types.

use crate::{AgentId, CoreError, TaskId, TaskPriority, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single unit of work submitted to an agent, as held by the remote store.
///
/// Records are never mutated locally. Each fetch replaces the whole local
/// cache, so a record only ever changes by being re-fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    /// Unique task identifier.
    pub id: TaskId,

    /// Agent that owns this task.
    pub agent_id: AgentId,

    /// Operation requested (e.g. "generate_outline").
    pub action: String,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Priority set at creation.
    #[serde(default)]
    pub priority: TaskPriority,

    /// Opaque payload supplied at creation.
    #[serde(default)]
    pub input: Value,

    /// Result payload, present only once `status` is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,

    /// Failure message, present only when `status` is failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the task was created. Absent on malformed upstream rows.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the task reached a terminal status. Set exactly once.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Create a new pending TaskRecord.
    pub fn new(agent_id: AgentId, action: impl Into<String>, input: Value) -> Self {
        Self {
            id: TaskId::generate(),
            agent_id,
            action: action.into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::default(),
            input,
            output: None,
            error: None,
            created_at: Some(Utc::now()),
            completed_at: None,
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: impl Into<TaskId>) -> Self {
        self.id = id.into();
        self
    }

    /// Builder method to mark the record completed with an output payload.
    pub fn with_output(mut self, output: Value) -> Self {
        self.status = TaskStatus::Completed;
        self.output = Some(output);
        self.completed_at = Some(Utc::now());
        self
    }

    /// Builder method to mark the record failed with an error message.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.status = TaskStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        self
    }

    /// Builder method to set the creation timestamp.
    pub fn with_created_at(mut self, at: Option<DateTime<Utc>>) -> Self {
        self.created_at = at;
        self
    }

    /// Check if the record is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Most recent timestamp on the record: completion time when set,
    /// otherwise creation time.
    pub fn activity_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at.or(self.created_at)
    }
}

/// Request shape for submitting a new task to the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    /// Agent kind to route the task to (e.g. "blog", "support").
    pub agent_kind: String,

    /// Operation to perform.
    pub action: String,

    /// Structured input payload.
    pub input: Value,

    /// Priority for the new task.
    #[serde(default)]
    pub priority: TaskPriority,
}

impl TaskRequest {
    /// Create a new request with default priority.
    pub fn new(agent_kind: impl Into<String>, action: impl Into<String>, input: Value) -> Self {
        Self {
            agent_kind: agent_kind.into(),
            action: action.into(),
            input,
            priority: TaskPriority::default(),
        }
    }

    /// Builder method to set the priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Build a request from a raw JSON input string, rejecting malformed
    /// payloads before anything is sent to the remote store. An empty
    /// string means "no input" and becomes an empty object.
    pub fn from_raw_input(
        agent_kind: impl Into<String>,
        action: impl Into<String>,
        raw_input: &str,
    ) -> Result<Self, CoreError> {
        let input = if raw_input.trim().is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_str(raw_input)
                .map_err(|e| CoreError::InvalidInput(format!("input is not valid JSON: {e}")))?
        };
        Ok(Self::new(agent_kind, action, input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_wire_shape() {
        let json_record = json!({
            "id": "t1",
            "agentId": "a1",
            "action": "generate_outline",
            "status": "completed",
            "output": {"response": {"title": "X"}},
            "createdAt": "2026-01-01T00:00:00Z",
            "completedAt": "2026-01-01T00:01:00Z"
        });
        let record: TaskRecord = serde_json::from_value(json_record).unwrap();
        assert_eq!(record.id, TaskId::new("t1"));
        assert_eq!(record.status, TaskStatus::Completed);
        assert!(record.output.is_some());
        assert!(record.error.is_none());
        assert_eq!(record.priority, TaskPriority::Medium);
    }

    #[test]
    fn test_record_missing_created_at() {
        let json_record = json!({
            "id": "t2",
            "agentId": "a1",
            "action": "send_email",
            "status": "pending"
        });
        let record: TaskRecord = serde_json::from_value(json_record).unwrap();
        assert!(record.created_at.is_none());
        assert!(record.activity_at().is_none());
    }

    #[test]
    fn test_activity_at_prefers_completion() {
        let record = TaskRecord::new(AgentId::new("a1"), "noop", json!({}))
            .with_output(json!({"ok": true}));
        assert_eq!(record.activity_at(), record.completed_at);
    }

    #[test]
    fn test_request_from_raw_input() {
        let req = TaskRequest::from_raw_input("blog", "generate_outline", r#"{"topic":"rust"}"#)
            .unwrap();
        assert_eq!(req.input["topic"], "rust");

        let empty = TaskRequest::from_raw_input("blog", "generate_outline", "  ").unwrap();
        assert_eq!(empty.input, json!({}));
    }

    #[test]
    fn test_request_rejects_malformed_input() {
        let err = TaskRequest::from_raw_input("blog", "generate_outline", "{not json");
        assert!(matches!(err, Err(CoreError::InvalidInput(_))));
    }
}
