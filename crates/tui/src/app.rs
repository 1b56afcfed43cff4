//! TUI application state and event loop.
//!
//! This module defines the main `App` struct that holds the watched task
//! state and drives the event loop using `tokio::select!`.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event as TermEvent, EventStream, KeyEvent};
use pw_client::{GenerationApi, MonitorEvent};
use pw_protocol::GenerationTask;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::select;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tracing::warn;

use crate::event_handler::{self, KeyAction};
use crate::tui::Tui;
use crate::widgets::{render_stage_table, render_summary};

/// Redraw cadence when no event arrives.
const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Main TUI application state.
pub struct App {
    /// The task being watched, mutated only through the reducer.
    pub task: GenerationTask,
    /// Whether the live-update channel is currently up.
    pub connected: bool,
    /// Identifier of the watched task.
    pub task_id: String,
    /// REST client, used for user-initiated cancellation.
    api: GenerationApi,
    /// Events from the task monitor.
    events_rx: mpsc::Receiver<MonitorEvent>,
    /// Loopback sender for actions the app itself produces.
    events_tx: mpsc::Sender<MonitorEvent>,
    /// Flag to indicate if the application should exit.
    pub should_exit: bool,
}

impl App {
    /// Create a new App around a monitor's event stream.
    ///
    /// `events_tx` must be a sender for the same channel as `events_rx`;
    /// the app uses it to feed its own cancel action back through the
    /// single event flow.
    pub fn new(
        api: GenerationApi,
        task_id: String,
        episode_id: String,
        events_rx: mpsc::Receiver<MonitorEvent>,
        events_tx: mpsc::Sender<MonitorEvent>,
    ) -> Self {
        let task = pw_client::reduce(
            GenerationTask::idle(),
            pw_client::TaskAction::Start {
                task_id: task_id.clone(),
                episode_id,
            },
        );

        Self {
            task,
            connected: false,
            task_id,
            api,
            events_rx,
            events_tx,
            should_exit: false,
        }
    }

    /// Main event loop.
    ///
    /// Uses `tokio::select!` to handle monitor events and keyboard input
    /// concurrently, with a periodic redraw tick.
    pub async fn run(&mut self, tui: &mut Tui) -> Result<()> {
        let mut term_events = EventStream::new();
        let mut frame = tokio::time::interval(FRAME_INTERVAL);

        while !self.should_exit {
            tui.draw(|f| render(f, &self.task, self.connected))?;

            select! {
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.handle_monitor_event(event),
                        // Monitor torn down underneath us.
                        None => self.should_exit = true,
                    }
                }
                Some(Ok(TermEvent::Key(key_event))) = term_events.next() => {
                    self.handle_key_event(key_event).await;
                }
                _ = frame.tick() => {}
            }
        }

        Ok(())
    }

    /// Handle events from the task monitor.
    fn handle_monitor_event(&mut self, event: MonitorEvent) {
        event_handler::handle_monitor_event(&mut self.task, &mut self.connected, event);
    }

    /// Handle keyboard events.
    async fn handle_key_event(&mut self, key_event: KeyEvent) {
        match event_handler::handle_key_event(key_event) {
            KeyAction::Quit => self.should_exit = true,
            KeyAction::Cancel => self.cancel().await,
            KeyAction::None => {}
        }
    }

    /// Ask the backend to cancel the run, then reflect it locally.
    ///
    /// The local state only moves once the backend acknowledged; the cancel
    /// action travels through the same event flow as everything else so
    /// ordering with in-flight channel events is preserved.
    async fn cancel(&mut self) {
        if self.task.status.is_terminal() {
            return;
        }
        match self.api.cancel(&self.task_id).await {
            Ok(_) => {
                let _ = self
                    .events_tx
                    .send(MonitorEvent::Action(pw_client::TaskAction::Cancel))
                    .await;
            }
            Err(err) => warn!("cancel request for {} failed: {err}", self.task_id),
        }
    }
}

/// Render the dashboard: summary on top, stage table below, help footer.
fn render(frame: &mut Frame, task: &GenerationTask, connected: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(11),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_summary(frame, chunks[0], task, connected);
    render_stage_table(frame, chunks[1], task);

    let help = Paragraph::new(" q: quit   c: cancel run")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[2]);
}
