//! Pure projections from task records to view items.
//!
//! Every mapper is total: it accepts any status, any action tag, and any
//! payload shape without panicking. A record that does not satisfy a
//! view's preconditions (e.g. no output yet for the conversation view) is
//! excluded or defaulted, never an error. Views regenerate their items
//! from the task cache on every refresh; nothing here is stored.

use agentdeck_core::{TaskId, TaskRecord, TaskStatus};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

/// Rendered in place of a missing timestamp.
pub const UNKNOWN_TIMESTAMP: &str = "Unknown";

/// How many records the log panel shows.
pub const LOG_PANEL_CAP: usize = 20;

/// Coarse status bucket for the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityBucket {
    /// Anything not yet terminal.
    Processing,
    Success,
    Error,
}

/// Display severity of an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Category tag used by the activity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityCategory {
    Task,
    Workflow,
    System,
}

/// One row of the activity log, with a serialized drill-down payload.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub id: TaskId,
    pub bucket: ActivityBucket,
    pub severity: Severity,
    pub category: ActivityCategory,
    pub message: String,
    pub timestamp: String,
    pub detail: String,
}

/// One card in the conversation view: a task that has produced output.
#[derive(Debug, Clone)]
pub struct ConversationEntry {
    pub task_id: TaskId,
    pub action: String,
    /// Normalized response body extracted from the task output.
    pub body: Value,
    pub created_at: Option<DateTime<Utc>>,
}

/// One row of the log panel.
#[derive(Debug, Clone)]
pub struct LogPanelEntry {
    pub id: TaskId,
    pub action: String,
    pub status: TaskStatus,
    /// Failure text, present only when the task failed.
    pub error: Option<String>,
    /// Present only once the task is terminal.
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Map a record into its activity-log entry.
pub fn activity_entry(task: &TaskRecord) -> ActivityEntry {
    let (bucket, severity) = match task.status {
        TaskStatus::Failed => (ActivityBucket::Error, Severity::Error),
        TaskStatus::Completed => (ActivityBucket::Success, Severity::Info),
        _ => (ActivityBucket::Processing, Severity::Info),
    };

    let message = match bucket {
        ActivityBucket::Success => format!("{} completed", task.action),
        ActivityBucket::Error => format!("{} failed", task.action),
        ActivityBucket::Processing => format!("{} in progress", task.action),
    };

    ActivityEntry {
        id: task.id.clone(),
        bucket,
        severity,
        category: category_for(&task.action),
        message,
        timestamp: format_timestamp(task.created_at),
        detail: detail_payload(task),
    }
}

/// Map all records into activity-log entries, preserving order.
pub fn activity_entries(tasks: &[TaskRecord]) -> Vec<ActivityEntry> {
    tasks.iter().map(activity_entry).collect()
}

/// Map a record into its conversation card. A task only becomes a
/// conversation once it has produced output; everything else is excluded.
pub fn conversation_entry(task: &TaskRecord) -> Option<ConversationEntry> {
    let output = task.output.as_ref()?;
    // a payload nested under "response" takes precedence over the flat form
    let body = match output.get("response") {
        Some(response) => response.clone(),
        None => output.clone(),
    };
    Some(ConversationEntry {
        task_id: task.id.clone(),
        action: task.action.clone(),
        body,
        created_at: task.created_at,
    })
}

/// Conversation cards for every record with output, preserving order.
pub fn conversation_entries(tasks: &[TaskRecord]) -> Vec<ConversationEntry> {
    tasks.iter().filter_map(conversation_entry).collect()
}

/// The most recent `cap` records as log-panel rows, newest first,
/// regardless of output presence.
pub fn log_panel(tasks: &[TaskRecord], cap: usize) -> Vec<LogPanelEntry> {
    let mut ordered: Vec<&TaskRecord> = tasks.iter().collect();
    ordered.sort_by(|a, b| b.activity_at().cmp(&a.activity_at()));
    ordered.into_iter().take(cap).map(log_panel_entry).collect()
}

fn log_panel_entry(task: &TaskRecord) -> LogPanelEntry {
    LogPanelEntry {
        id: task.id.clone(),
        action: task.action.clone(),
        status: task.status,
        error: match task.status {
            TaskStatus::Failed => task.error.clone(),
            _ => None,
        },
        completed_at: task.completed_at.filter(|_| task.is_terminal()),
        created_at: task.created_at,
    }
}

/// Derive the filter category from the action tag. Unknown actions are
/// plain tasks.
pub fn category_for(action: &str) -> ActivityCategory {
    if action.starts_with("workflow") {
        ActivityCategory::Workflow
    } else if action.starts_with("system") {
        ActivityCategory::System
    } else {
        ActivityCategory::Task
    }
}

/// Format a timestamp for display, or the literal placeholder when absent.
pub fn format_timestamp(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => UNKNOWN_TIMESTAMP.to_string(),
    }
}

fn detail_payload(task: &TaskRecord) -> String {
    let detail = json!({
        "input": task.input,
        "output": task.output,
        "error": task.error,
    });
    serde_json::to_string_pretty(&detail).unwrap_or_default()
}
