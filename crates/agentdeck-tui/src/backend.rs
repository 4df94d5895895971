//! Background task owning the view sessions and serving the UI thread.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{info, warn};

use agentdeck_client::{HttpClient, TaskStore};
use agentdeck_core::TaskRequest;
use agentdeck_sync::{ActivityFeed, AgentConsole};

use crate::event::{UiCommand, UiEvent};

/// Backend configuration from CLI arguments.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub endpoint: String,
    pub agent_kind: String,
    pub refresh: Duration,
    pub page_size: u32,
    pub activity_limit: u32,
}

/// Run the background loop.
///
/// This function runs in a separate thread with its own tokio runtime. It
/// owns both view sessions, publishes their snapshots to the UI thread,
/// and applies commands coming back from it.
pub async fn run_backend(
    config: BackendConfig,
    ui_tx: mpsc::Sender<UiEvent>,
    mut cmd_rx: mpsc::Receiver<UiCommand>,
) {
    info!(endpoint = %config.endpoint, agent_kind = %config.agent_kind, "starting backend");

    let store: Arc<dyn TaskStore> = Arc::new(HttpClient::new(&config.endpoint));
    let console = AgentConsole::new(store.clone(), config.agent_kind.clone(), config.page_size);
    let feed = ActivityFeed::new(store, config.activity_limit);

    console.start(config.refresh);
    feed.start(config.refresh);

    // publish fresh snapshots a few times a second; the views poll the
    // store on their own schedule
    let mut publish = tokio::time::interval(Duration::from_millis(250));

    loop {
        tokio::select! {
            _ = publish.tick() => {
                let _ = ui_tx.send(UiEvent::ConsoleUpdated(console.snapshot())).await;
                let _ = ui_tx.send(UiEvent::ActivityUpdated(feed.snapshot())).await;
            }

            Some(cmd) = cmd_rx.recv() => {
                match cmd {
                    UiCommand::Quit => {
                        info!("received quit command, shutting down backend");
                        break;
                    }
                    UiCommand::NextPage => {
                        if let Err(e) = console.next_page().await {
                            warn!(error = %e, "page navigation failed");
                        }
                    }
                    UiCommand::PreviousPage => {
                        if let Err(e) = console.previous_page().await {
                            warn!(error = %e, "page navigation failed");
                        }
                    }
                    UiCommand::CycleFilter => {
                        feed.cycle_filter();
                    }
                    UiCommand::SelectConsoleTask(id) => console.select(id),
                    UiCommand::SelectActivity(id) => feed.select(id),
                    UiCommand::Refresh => {
                        console.refresh_now().await;
                        feed.refresh_now().await;
                    }
                    UiCommand::Submit { action, input } => {
                        submit(&console, &config.agent_kind, &action, &input, &ui_tx).await;
                    }
                }
                // commands change state; publish without waiting for the tick
                let _ = ui_tx.send(UiEvent::ConsoleUpdated(console.snapshot())).await;
                let _ = ui_tx.send(UiEvent::ActivityUpdated(feed.snapshot())).await;
            }
        }
    }

    console.stop();
    feed.stop();
    info!("backend shutdown complete");
}

/// Validate and submit a task request. Malformed input is rejected here,
/// before anything reaches the store.
async fn submit(
    console: &AgentConsole,
    agent_kind: &str,
    action: &str,
    input: &str,
    ui_tx: &mpsc::Sender<UiEvent>,
) {
    let request = match TaskRequest::from_raw_input(agent_kind, action, input) {
        Ok(request) => request,
        Err(e) => {
            let _ = ui_tx.send(UiEvent::SubmitFailed(e.to_string())).await;
            return;
        }
    };

    match console.submit(request).await {
        Ok(record) => {
            info!(task_id = %record.id, action = %action, "task submitted");
            let _ = ui_tx.send(UiEvent::Submitted(record.id)).await;
        }
        Err(e) => {
            warn!(error = %e, "task submission failed");
            let _ = ui_tx.send(UiEvent::SubmitFailed(e.to_string())).await;
        }
    }
}
