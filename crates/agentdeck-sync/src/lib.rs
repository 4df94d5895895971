//! Task activity synchronization and projection layer.
//!
//! This crate holds the logic behind every Agentdeck view: a polling
//! schedule with stale-fetch rejection ([`poll`]), a paginated window over
//! the remote task collection ([`pager`]), pure projections from task
//! records to view items ([`project`]), client-local filter and selection
//! state ([`select`]), and the view-session objects that tie them together
//! with an explicit start/stop lifecycle ([`console`], [`feed`]).
//!
//! Nothing here renders. Presentation layers consume cloneable snapshots
//! and drive the exposed pagination/filter/selection hooks.

pub mod console;
pub mod feed;
pub mod pager;
pub mod poll;
pub mod project;
pub mod select;

pub use console::{AgentConsole, ConsoleSnapshot};
pub use feed::{ActivityFeed, FeedSnapshot};
pub use pager::{TaskPager, TaskWindow};
pub use poll::{FetchSeq, Poller};
pub use project::{
    ActivityBucket, ActivityCategory, ActivityEntry, ConversationEntry, LogPanelEntry, Severity,
    LOG_PANEL_CAP,
};
pub use select::{ActivityFilter, Selection};

/// Lock a shared state mutex, recovering from poisoning. Holders never
/// leave state partially written (swaps are whole-value), so a poisoned
/// guard is still consistent.
pub(crate) fn lock<T>(mutex: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
pub(crate) mod testutil;
