//! Stage table widget for displaying pipeline stages.
//!
//! This module provides a table-based view of all productive stages,
//! showing their name, status, progress, and last message.

use pw_protocol::{GenerationTask, Stage, StageInfo, StageStatus};
use ratatui::layout::Constraint;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Cell;
use ratatui::widgets::Row;
use ratatui::widgets::Table;
use ratatui::Frame;

/// Renders the pipeline stages as a table, one row per productive stage.
///
/// # Arguments
/// * `frame` - The frame to render into
/// * `area` - The area to render the table in
/// * `task` - The task whose stages to display
pub fn render_stage_table(frame: &mut Frame, area: Rect, task: &GenerationTask) {
    // Create table rows from stages with color-coded status
    let rows: Vec<Row> = Stage::PRODUCTIVE
        .iter()
        .map(|stage| {
            let fallback = StageInfo::pending(*stage);
            let info = task.stages.get(stage).unwrap_or(&fallback);

            let status_style = match info.status {
                StageStatus::InProgress => Style::default().fg(Color::Green),
                StageStatus::Completed => Style::default().fg(Color::Cyan),
                StageStatus::Failed => Style::default().fg(Color::Red),
                StageStatus::Pending => Style::default().fg(Color::Yellow),
            };

            let marker = if task.current_stage == Some(*stage) {
                ">"
            } else {
                " "
            };

            Row::new(vec![
                Cell::from(marker),
                Cell::from(stage.display_name()),
                Cell::from(format!("{:?}", info.status)).style(status_style),
                Cell::from(format_progress(info.progress)),
                Cell::from(info.message.clone().unwrap_or_default()),
            ])
        })
        .collect();

    // Create table header with styling
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Stage"),
        Cell::from("Status"),
        Cell::from("Progress"),
        Cell::from("Message"),
    ])
    .style(
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Cyan),
    );

    let widths = [
        Constraint::Length(1),
        Constraint::Length(20),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Percentage(50),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Pipeline Stages")
            .style(Style::default().fg(Color::White)),
    );

    frame.render_widget(table, area);
}

/// Format a stage progress value as a padded percentage.
fn format_progress(progress: f64) -> String {
    format!("{:>5.1}%", progress.clamp(0.0, 100.0))
}
