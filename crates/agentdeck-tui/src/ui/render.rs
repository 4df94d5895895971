//! Main render function for the TUI.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, Tabs};
use ratatui::Frame;

use agentdeck_core::TaskStatus;
use agentdeck_sync::{ActivityBucket, Severity};

use crate::event::ConnectionState;
use crate::format::{short_time, status_label, truncate};
use crate::state::{UiState, View};

/// Render the entire UI.
pub fn render(frame: &mut Frame, state: &UiState) {
    let area = frame.area();

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, header_area, state);

    match state.current_view {
        View::Console => render_console(frame, body_area, state),
        View::Activity => render_activity(frame, body_area, state),
    }

    render_footer(frame, footer_area, state);
}

/// Render the header with navigation tabs.
fn render_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let titles = vec!["[1] Console", "[2] Activity"];

    let selected = match state.current_view {
        View::Console => 0,
        View::Activity => 1,
    };

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Agentdeck ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Render the footer with connection and status information.
fn render_footer(frame: &mut Frame, area: Rect, state: &UiState) {
    let (connection, connection_style) = match &state.connection {
        ConnectionState::Connecting => ("Connecting...".to_string(), Style::default().fg(Color::Yellow)),
        ConnectionState::Connected => ("Connected".to_string(), Style::default().fg(Color::Green)),
        ConnectionState::Degraded { message } => (
            format!("Degraded: {}", truncate(message, 40)),
            Style::default().fg(Color::Red),
        ),
    };

    let status = state.status_message.as_deref().unwrap_or("Ready");

    let help = match state.current_view {
        View::Console => " q: quit | Tab: view | j/k: select | n/p: page | i: submit | r: refresh ",
        View::Activity => " q: quit | Tab: view | j/k: select | f: filter | r: refresh ",
    };

    let footer = Line::from(vec![
        Span::styled(connection, connection_style),
        Span::raw(" | "),
        Span::styled(status, Style::default().fg(Color::Green)),
        Span::raw(" | "),
        Span::styled(help, Style::default().fg(Color::DarkGray)),
    ]);

    frame.render_widget(Paragraph::new(footer), area);
}

/// Render the agent console: metrics, the paged task queue, and either
/// the conversation cards or the selected task's details.
fn render_console(frame: &mut Frame, area: Rect, state: &UiState) {
    let [summary_area, main_area, input_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(if state.input_active { 3 } else { 0 }),
    ])
    .areas(area);

    render_console_summary(frame, summary_area, state);

    let [queue_area, side_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
            .areas(main_area);

    render_task_queue(frame, queue_area, state);
    render_conversations(frame, side_area, state);

    if state.input_active {
        render_input_prompt(frame, input_area, state);
    }
}

fn render_console_summary(frame: &mut Frame, area: Rect, state: &UiState) {
    let snapshot = &state.console;

    let line = match (&snapshot.agent, &snapshot.metrics) {
        (Some(agent), Some(metrics)) => Line::from(vec![
            Span::styled(
                format!(" {} ", agent.name),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "| total: {} | completed: {} | failed: {} | active: {} ",
                metrics.total_tasks,
                metrics.count(TaskStatus::Completed),
                metrics.count(TaskStatus::Failed),
                metrics.count(TaskStatus::Pending) + metrics.count(TaskStatus::Processing),
            )),
            Span::styled(
                match snapshot.last_activity {
                    Some(at) => format!("| last activity: {} ", short_time(Some(at))),
                    None => "| no activity yet ".to_string(),
                },
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        _ => Line::from(Span::styled(
            " Agent not available yet - waiting for the store ",
            Style::default().fg(Color::Yellow),
        )),
    };

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" Agent ")),
        area,
    );
}

fn render_task_queue(frame: &mut Frame, area: Rect, state: &UiState) {
    let snapshot = &state.console;
    let window = &snapshot.window;

    let title = if window.total_count > 0 {
        format!(
            " Tasks (page {}/{}, {} total) ",
            window.page_index,
            window.total_pages(),
            window.total_count
        )
    } else {
        " Tasks ".to_string()
    };

    if snapshot.log_panel.is_empty() {
        let empty = Paragraph::new("\n  No tasks yet.")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let rows: Vec<Row> = snapshot
        .log_panel
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let status_style = match entry.status {
                TaskStatus::Completed => Style::default().fg(Color::Green),
                TaskStatus::Failed => Style::default().fg(Color::Red),
                _ => Style::default().fg(Color::Yellow),
            };

            let detail = match (&entry.error, entry.completed_at) {
                (Some(error), _) => truncate(error, 30),
                (None, Some(at)) => short_time(Some(at)),
                (None, None) => "-".to_string(),
            };

            let selected = snapshot.selected.as_ref() == Some(&entry.id);
            let base = if i == state.console_cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(truncate(entry.action.as_str(), 24)),
                Cell::from(status_label(entry.status)).style(status_style),
                Cell::from(short_time(entry.created_at)),
                Cell::from(detail),
            ])
            .style(base)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Fill(1),
        ],
    )
    .header(
        Row::new(vec!["Action", "Status", "Created", "Done/Error"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(table, area);
}

fn render_conversations(frame: &mut Frame, area: Rect, state: &UiState) {
    let snapshot = &state.console;

    if snapshot.conversations.is_empty() {
        let empty = Paragraph::new("\n  No responses yet.")
            .block(Block::default().borders(Borders::ALL).title(" Responses "));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .conversations
        .iter()
        .map(|entry| {
            let selected = snapshot.selected.as_ref() == Some(&entry.task_id);
            let style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let body = entry
                .body
                .get("title")
                .and_then(|t| t.as_str())
                .map(str::to_owned)
                .unwrap_or_else(|| truncate(&entry.body.to_string(), 60));
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}: ", entry.action), Style::default().fg(Color::DarkGray)),
                Span::styled(body, style),
            ]))
        })
        .collect();

    let list =
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Responses "));
    frame.render_widget(list, area);
}

fn render_input_prompt(frame: &mut Frame, area: Rect, state: &UiState) {
    let prompt = Paragraph::new(format!("> {}", state.input_buffer)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Submit: <action> [json input] (Enter to send, Esc to cancel) ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(prompt, area);
}

/// Render the global activity log with its detail pane.
fn render_activity(frame: &mut Frame, area: Rect, state: &UiState) {
    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
            .areas(area);

    render_activity_list(frame, list_area, state);
    render_activity_detail(frame, detail_area, state);
}

fn render_activity_list(frame: &mut Frame, area: Rect, state: &UiState) {
    let snapshot = &state.activity;
    let title = format!(
        " Activity [{}] ({}/{}) ",
        snapshot.filter.label(),
        snapshot.entries.len(),
        snapshot.total_entries
    );

    if snapshot.entries.is_empty() {
        let empty = Paragraph::new("\n  No activity.")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = snapshot
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let bucket_style = match entry.bucket {
                ActivityBucket::Success => Style::default().fg(Color::Green),
                ActivityBucket::Error => Style::default().fg(Color::Red),
                ActivityBucket::Processing => Style::default().fg(Color::Yellow),
            };

            let severity = match entry.severity {
                Severity::Error => Span::styled("ERROR ", Style::default().fg(Color::Red)),
                Severity::Info => Span::styled("INFO  ", Style::default().fg(Color::DarkGray)),
            };

            let base = if i == state.activity_cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", entry.timestamp), Style::default().fg(Color::DarkGray)),
                severity,
                Span::styled(truncate(&entry.message, 48), bucket_style),
            ]))
            .style(base)
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(list, area);
}

fn render_activity_detail(frame: &mut Frame, area: Rect, state: &UiState) {
    let snapshot = &state.activity;

    let content = snapshot
        .selected
        .as_ref()
        .and_then(|id| snapshot.entries.iter().find(|e| &e.id == id))
        .map(|entry| entry.detail.clone())
        .unwrap_or_else(|| "\n  Select an entry to view details.".to_string());

    let detail = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(ratatui::widgets::Wrap { trim: false });
    frame.render_widget(detail, area);
}
