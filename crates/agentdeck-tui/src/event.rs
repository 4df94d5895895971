//! Event types for communication between the backend and the UI thread.

use agentdeck_core::TaskId;
use agentdeck_sync::{ConsoleSnapshot, FeedSnapshot};

/// Connection state derived from poll outcomes.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    /// No snapshot received yet.
    #[default]
    Connecting,

    /// Last poll cycle succeeded.
    Connected,

    /// Polling continues but the last cycle failed; the views show the
    /// previous snapshot.
    Degraded { message: String },
}

/// Events sent from the backend to the UI thread.
#[derive(Debug)]
pub enum UiEvent {
    /// Fresh console snapshot.
    ConsoleUpdated(ConsoleSnapshot),

    /// Fresh activity feed snapshot.
    ActivityUpdated(FeedSnapshot),

    /// A submitted task was acknowledged by the store.
    Submitted(TaskId),

    /// Submission failed; the input buffer is preserved for retry.
    SubmitFailed(String),
}

/// Commands sent from the UI thread to the backend.
#[derive(Debug)]
pub enum UiCommand {
    /// Advance the console queue one page.
    NextPage,

    /// Go back one page in the console queue.
    PreviousPage,

    /// Advance the activity filter.
    CycleFilter,

    /// Select a task in the console view.
    SelectConsoleTask(Option<TaskId>),

    /// Select an entry in the activity view.
    SelectActivity(Option<TaskId>),

    /// Submit a new task to the console's agent.
    Submit { action: String, input: String },

    /// Refresh both views immediately.
    Refresh,

    /// Quit the application.
    Quit,
}
