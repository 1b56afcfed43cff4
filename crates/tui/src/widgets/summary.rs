//! Summary widget for the watched task.
//!
//! Shows overall progress as a gauge plus a one-line status strip with the
//! connection state, terminal outcome, and video URL when available.

use pw_client::overall_progress;
use pw_protocol::{GenerationTask, TaskStatus};
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Gauge;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Renders the overall-progress gauge and status line.
///
/// # Arguments
/// * `frame` - The frame to render into
/// * `area` - The area to render the summary in
/// * `task` - The task being watched
/// * `connected` - Whether the live-update channel is currently up
pub fn render_summary(frame: &mut Frame, area: Rect, task: &GenerationTask, connected: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let progress = overall_progress(task).clamp(0.0, 100.0);
    let title = match &task.episode_id {
        Some(episode_id) => format!("Episode {episode_id}"),
        None => "Generation".to_string(),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(gauge_style(task.status))
        .ratio(progress / 100.0)
        .label(format!("{progress:.1}%"));
    frame.render_widget(gauge, chunks[0]);

    frame.render_widget(Paragraph::new(status_line(task, connected)), chunks[1]);
}

fn gauge_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Running => Style::default().fg(Color::Green),
        TaskStatus::Completed => Style::default().fg(Color::Cyan),
        TaskStatus::Failed => Style::default().fg(Color::Red),
        TaskStatus::Cancelled => Style::default().fg(Color::DarkGray),
        TaskStatus::Idle => Style::default().fg(Color::Gray),
    }
}

/// One-line status strip under the gauge.
fn status_line(task: &GenerationTask, connected: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!(" {:?} ", task.status),
            gauge_style(task.status),
        ),
        if connected {
            Span::styled("[live]", Style::default().fg(Color::Green))
        } else {
            Span::styled("[polling]", Style::default().fg(Color::Yellow))
        },
    ];

    if let Some(error) = &task.error {
        spans.push(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        ));
    }
    if let Some(video_url) = &task.video_url {
        spans.push(Span::raw(format!(" {video_url}")));
    }

    Line::from(spans)
}
