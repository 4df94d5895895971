//! Agentdeck operator dashboard.
//!
//! Terminal dashboard for monitoring agent task execution: per-agent
//! console with a paged task queue and submission prompt, plus a global
//! activity log.

use std::error::Error;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::info;

mod app;
mod backend;
mod event;
mod format;
mod state;
mod ui;

use app::App;
use backend::BackendConfig;
use event::{UiCommand, UiEvent};

#[derive(Parser)]
#[command(name = "agentdeck-tui")]
#[command(about = "Agentdeck operator dashboard")]
#[command(version)]
struct Cli {
    /// Task store HTTP endpoint
    #[arg(short, long, default_value = "http://localhost:4000/api")]
    endpoint: String,

    /// Agent kind for the console view (e.g. blog, sales, support)
    #[arg(short, long, default_value = "blog")]
    agent: String,

    /// Refresh interval in seconds
    #[arg(short, long, default_value = "5")]
    refresh: u64,

    /// Tasks per page in the console queue
    #[arg(long, default_value = "10")]
    page_size: u32,

    /// Entries in the global activity feed
    #[arg(long, default_value = "50")]
    activity_limit: u32,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing - write to file to avoid terminal interference
    // Logs go to /tmp/agentdeck-tui.log
    let log_file = std::fs::File::create("/tmp/agentdeck-tui.log").ok();
    if let Some(file) = log_file {
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter("agentdeck=debug")
            .with_ansi(false)
            .init();
    }

    let cli = Cli::parse();

    info!(endpoint = %cli.endpoint, agent = %cli.agent, refresh = cli.refresh, "Starting dashboard");

    let config = BackendConfig {
        endpoint: cli.endpoint,
        agent_kind: cli.agent,
        refresh: Duration::from_secs(cli.refresh.max(1)),
        page_size: cli.page_size,
        activity_limit: cli.activity_limit,
    };
    let page_size = config.page_size;

    // Create channels for UI <-> backend communication
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<UiCommand>(100);

    // Spawn background thread with its own tokio runtime
    let bg_handle = std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        rt.block_on(backend::run_backend(config, ui_tx, cmd_rx));
    });

    // Initialize terminal (enters alternate screen, enables raw mode)
    let terminal = ratatui::init();

    // Run UI loop on main thread
    let mut app = App::new(page_size, ui_rx, cmd_tx);
    let result = app.run(terminal);

    // Restore terminal (exits alternate screen, disables raw mode)
    ratatui::restore();

    // Wait for background thread to finish
    let _ = bg_handle.join();

    info!("Dashboard shutdown complete");

    result.map_err(|e| e.into())
}
