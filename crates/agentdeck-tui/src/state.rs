//! UI state for rendering.

use agentdeck_sync::{ConsoleSnapshot, FeedSnapshot};

use crate::event::ConnectionState;

/// Available views in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Console,
    Activity,
}

/// Snapshot of data for rendering (no async, no locks).
pub struct UiState {
    /// Agent console snapshot from the backend.
    pub console: ConsoleSnapshot,

    /// Activity feed snapshot from the backend.
    pub activity: FeedSnapshot,

    /// Current view/tab.
    pub current_view: View,

    /// Connection state derived from poll outcomes.
    pub connection: ConnectionState,

    /// Status message to display in the footer.
    pub status_message: Option<String>,

    /// Cursor row in the console queue.
    pub console_cursor: usize,

    /// Cursor row in the activity list.
    pub activity_cursor: usize,

    /// Whether the submit prompt is capturing keystrokes.
    pub input_active: bool,

    /// Submit prompt contents: `<action> [json input]`. Preserved on
    /// submission failure so the operator can retry without re-entering.
    pub input_buffer: String,
}

impl UiState {
    pub fn new(page_size: u32) -> Self {
        Self {
            console: ConsoleSnapshot::empty(page_size),
            activity: FeedSnapshot::empty(),
            current_view: View::default(),
            connection: ConnectionState::default(),
            status_message: None,
            console_cursor: 0,
            activity_cursor: 0,
            input_active: false,
            input_buffer: String::new(),
        }
    }

    /// Rows in the currently visible list.
    pub fn visible_rows(&self) -> usize {
        match self.current_view {
            View::Console => self.console.log_panel.len(),
            View::Activity => self.activity.entries.len(),
        }
    }

    /// Cursor in the currently visible list.
    pub fn cursor(&self) -> usize {
        match self.current_view {
            View::Console => self.console_cursor,
            View::Activity => self.activity_cursor,
        }
    }

    pub fn set_cursor(&mut self, cursor: usize) {
        match self.current_view {
            View::Console => self.console_cursor = cursor,
            View::Activity => self.activity_cursor = cursor,
        }
    }

    /// Keep cursors inside the (possibly shrunken) fresh snapshots.
    pub fn clamp_cursors(&mut self) {
        self.console_cursor = self
            .console_cursor
            .min(self.console.log_panel.len().saturating_sub(1));
        self.activity_cursor = self
            .activity_cursor
            .min(self.activity.entries.len().saturating_sub(1));
    }
}
