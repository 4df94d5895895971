//! Client-local filter and selection state.

use agentdeck_core::{TaskId, TaskRecord};
use chrono::{DateTime, Utc};

use crate::project::{ActivityCategory, ActivityEntry};

/// Category filter over the activity log. `All` is the identity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Tasks,
    Workflows,
    System,
}

impl ActivityFilter {
    pub fn matches(&self, category: ActivityCategory) -> bool {
        match self {
            Self::All => true,
            Self::Tasks => category == ActivityCategory::Task,
            Self::Workflows => category == ActivityCategory::Workflow,
            Self::System => category == ActivityCategory::System,
        }
    }

    /// Apply the filter to a projected entry list.
    pub fn apply(&self, entries: &[ActivityEntry]) -> Vec<ActivityEntry> {
        entries
            .iter()
            .filter(|e| self.matches(e.category))
            .cloned()
            .collect()
    }

    /// The next filter in display order, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            Self::All => Self::Tasks,
            Self::Tasks => Self::Workflows,
            Self::Workflows => Self::System,
            Self::System => Self::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Tasks => "Tasks",
            Self::Workflows => "Workflows",
            Self::System => "System",
        }
    }
}

/// At most one selected task, tracked by identity.
///
/// Selection survives refreshes only while the id is still present in the
/// record set; a vanished id clears the selection rather than leaving it
/// pointing at stale data.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    selected: Option<TaskId>,
}

impl Selection {
    pub fn select(&mut self, id: TaskId) {
        self.selected = Some(id);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&TaskId> {
        self.selected.as_ref()
    }

    /// Re-resolve the selection against a freshly loaded record set.
    pub fn retain_present(&mut self, records: &[TaskRecord]) {
        if let Some(id) = &self.selected {
            if !records.iter().any(|r| &r.id == id) {
                self.selected = None;
            }
        }
    }
}

/// The most recent activity timestamp across the loaded records:
/// completion time when present, creation time otherwise. Derived on
/// every record-set change, never cached independently.
pub fn last_activity(records: &[TaskRecord]) -> Option<DateTime<Utc>> {
    records.iter().filter_map(|r| r.activity_at()).max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::activity_entries;
    use agentdeck_core::AgentId;
    use chrono::TimeZone;
    use serde_json::json;

    fn task(id: &str, action: &str) -> TaskRecord {
        TaskRecord::new(AgentId::new("a1"), action, json!({})).with_id(id)
    }

    #[test]
    fn test_filter_matches_categories() {
        let entries = activity_entries(&[
            task("t1", "generate_outline"),
            task("t2", "workflow_publish"),
            task("t3", "system_health"),
        ]);

        assert_eq!(ActivityFilter::All.apply(&entries).len(), 3);
        assert_eq!(ActivityFilter::Tasks.apply(&entries).len(), 1);
        assert_eq!(ActivityFilter::Workflows.apply(&entries).len(), 1);
        assert_eq!(ActivityFilter::System.apply(&entries).len(), 1);
    }

    #[test]
    fn test_filter_cycle_wraps() {
        let mut filter = ActivityFilter::default();
        for _ in 0..4 {
            filter = filter.next();
        }
        assert_eq!(filter, ActivityFilter::All);
    }

    #[test]
    fn test_selection_survives_when_id_present() {
        let mut selection = Selection::default();
        selection.select(TaskId::new("t1"));
        selection.retain_present(&[task("t1", "a"), task("t2", "b")]);
        assert_eq!(selection.selected(), Some(&TaskId::new("t1")));
    }

    #[test]
    fn test_selection_cleared_when_id_absent() {
        let mut selection = Selection::default();
        selection.select(TaskId::new("t1"));
        selection.retain_present(&[task("t2", "b")]);
        assert_eq!(selection.selected(), None);
    }

    #[test]
    fn test_last_activity_prefers_completion_time() {
        let created = chrono::Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let completed = chrono::Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();

        let mut done = task("t1", "a").with_created_at(Some(created));
        done.status = agentdeck_core::TaskStatus::Completed;
        done.completed_at = Some(completed);
        let pending = task("t2", "b").with_created_at(Some(created));

        assert_eq!(last_activity(&[pending.clone(), done]), Some(completed));
        assert_eq!(last_activity(&[pending]), Some(created));
        assert_eq!(last_activity(&[]), None);
    }
}
