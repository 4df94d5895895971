//! Application state and main event loop.

use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use agentdeck_core::TaskId;

use crate::event::{ConnectionState, UiCommand, UiEvent};
use crate::state::{UiState, View};
use crate::ui;

/// Main application with UI state and channel handles.
pub struct App {
    /// Current UI state snapshot for rendering.
    state: UiState,

    /// Receiver for events from the backend.
    ui_rx: mpsc::Receiver<UiEvent>,

    /// Sender for commands to the backend.
    cmd_tx: mpsc::Sender<UiCommand>,
}

impl App {
    /// Create a new application instance with channel handles.
    pub fn new(
        page_size: u32,
        ui_rx: mpsc::Receiver<UiEvent>,
        cmd_tx: mpsc::Sender<UiCommand>,
    ) -> Self {
        Self {
            state: UiState::new(page_size),
            ui_rx,
            cmd_tx,
        }
    }

    /// Run the main event loop.
    ///
    /// This runs on the main thread and handles:
    /// - Drawing the UI
    /// - Processing keyboard input
    /// - Receiving updates from the backend
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> std::io::Result<()> {
        loop {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            // Poll terminal events (non-blocking with short timeout)
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code) {
                        break; // quit requested
                    }
                }
            }

            // Process backend events (non-blocking)
            while let Ok(event) = self.ui_rx.try_recv() {
                self.apply_event(event);
            }
        }

        // Send quit command to backend
        let _ = self.cmd_tx.blocking_send(UiCommand::Quit);

        Ok(())
    }

    /// Apply an event from the backend to the UI state.
    fn apply_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::ConsoleUpdated(snapshot) => {
                self.state.console = snapshot;
                self.state.clamp_cursors();
                self.update_connection();
            }
            UiEvent::ActivityUpdated(snapshot) => {
                self.state.activity = snapshot;
                self.state.clamp_cursors();
                self.update_connection();
            }
            UiEvent::Submitted(task_id) => {
                self.state.status_message = Some(format!("Task submitted: {task_id}"));
                self.state.input_buffer.clear();
                self.state.input_active = false;
            }
            UiEvent::SubmitFailed(message) => {
                // keep the buffer so the operator can fix and retry
                self.state.status_message = Some(format!("Submit failed: {message}"));
            }
        }
    }

    /// Derive the connection state from the latest snapshots.
    fn update_connection(&mut self) {
        let error = self
            .state
            .console
            .last_error
            .as_ref()
            .or(self.state.activity.last_error.as_ref());
        self.state.connection = match error {
            Some(message) => ConnectionState::Degraded {
                message: message.clone(),
            },
            None => ConnectionState::Connected,
        };
    }

    /// Handle a key press.
    ///
    /// Returns true if the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.state.input_active {
            self.handle_input_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => {
                return true;
            }
            KeyCode::Esc => match self.state.current_view {
                View::Console => {
                    let _ = self.cmd_tx.blocking_send(UiCommand::SelectConsoleTask(None));
                }
                View::Activity => {
                    let _ = self.cmd_tx.blocking_send(UiCommand::SelectActivity(None));
                }
            },

            // View switching
            KeyCode::Char('1') => {
                self.state.current_view = View::Console;
            }
            KeyCode::Char('2') => {
                self.state.current_view = View::Activity;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.state.current_view = match self.state.current_view {
                    View::Console => View::Activity,
                    View::Activity => View::Console,
                };
            }

            // Up/Down or j/k navigation, selection follows the cursor
            KeyCode::Up | KeyCode::Char('k') => {
                let cursor = self.state.cursor().saturating_sub(1);
                self.state.set_cursor(cursor);
                self.select_at_cursor();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.state.visible_rows();
                if rows > 0 {
                    let cursor = (self.state.cursor() + 1).min(rows - 1);
                    self.state.set_cursor(cursor);
                    self.select_at_cursor();
                }
            }

            // Pagination (console queue only)
            KeyCode::Char('n') | KeyCode::Right => {
                if self.state.current_view == View::Console {
                    let _ = self.cmd_tx.blocking_send(UiCommand::NextPage);
                }
            }
            KeyCode::Char('p') | KeyCode::Left => {
                if self.state.current_view == View::Console {
                    let _ = self.cmd_tx.blocking_send(UiCommand::PreviousPage);
                }
            }

            // Activity filter
            KeyCode::Char('f') => {
                if self.state.current_view == View::Activity {
                    let _ = self.cmd_tx.blocking_send(UiCommand::CycleFilter);
                }
            }

            // Submit prompt (needs a resolved agent)
            KeyCode::Char('i') => {
                if self.state.current_view == View::Console && self.state.console.is_ready() {
                    self.state.input_active = true;
                }
            }

            // Manual refresh
            KeyCode::Char('r') => {
                let _ = self.cmd_tx.blocking_send(UiCommand::Refresh);
            }

            _ => {}
        }
        false
    }

    /// Handle a key press while the submit prompt is active.
    fn handle_input_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.state.input_active = false;
            }
            KeyCode::Enter => {
                let buffer = self.state.input_buffer.trim();
                if buffer.is_empty() {
                    return;
                }
                let (action, input) = match buffer.split_once(' ') {
                    Some((action, input)) => (action.to_string(), input.to_string()),
                    None => (buffer.to_string(), String::new()),
                };
                let _ = self.cmd_tx.blocking_send(UiCommand::Submit { action, input });
            }
            KeyCode::Backspace => {
                self.state.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.state.input_buffer.push(c);
            }
            _ => {}
        }
    }

    /// Sync the core's selection with the local cursor.
    fn select_at_cursor(&mut self) {
        match self.state.current_view {
            View::Console => {
                let id = self.id_at(self.state.console_cursor, View::Console);
                let _ = self.cmd_tx.blocking_send(UiCommand::SelectConsoleTask(id));
            }
            View::Activity => {
                let id = self.id_at(self.state.activity_cursor, View::Activity);
                let _ = self.cmd_tx.blocking_send(UiCommand::SelectActivity(id));
            }
        }
    }

    fn id_at(&self, cursor: usize, view: View) -> Option<TaskId> {
        match view {
            View::Console => self
                .state
                .console
                .log_panel
                .get(cursor)
                .map(|entry| entry.id.clone()),
            View::Activity => self
                .state
                .activity
                .entries
                .get(cursor)
                .map(|entry| entry.id.clone()),
        }
    }
}
