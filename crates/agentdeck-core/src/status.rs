//! Status and priority enums for task records.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task in the remote store.
///
/// Transitions are forward-only: a record never moves back to an earlier
/// state, so a refreshed fetch can only show the same or a later status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task submitted but not yet picked up by the agent.
    #[default]
    Pending,
    /// Agent is actively working on the task.
    Processing,
    /// Task finished successfully; `output` is populated.
    Completed,
    /// Task finished with an error; `error` is populated.
    Failed,
}

impl TaskStatus {
    /// Returns true if the status is terminal (completed or failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the task is still in flight.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// All status values, in lifecycle order.
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pending,
            TaskStatus::Processing,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ]
    }
}

/// Priority assigned to a task at creation. Immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!TaskStatus::Pending.is_terminal());
        assert!(!TaskStatus::Processing.is_terminal());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(TaskStatus::Failed.is_terminal());
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TaskStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
        let parsed: TaskStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Failed);
    }

    #[test]
    fn test_default_priority() {
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }
}
