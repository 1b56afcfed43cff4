//! Event handling utilities for the TUI.
//!
//! Monitor events mutate the task state through the reducer; keyboard
//! events map to app-level actions. Both handlers are pure so they can be
//! tested without a terminal or a running monitor.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use pw_client::{reduce, MonitorEvent};
use pw_protocol::GenerationTask;

/// App-level action requested by a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Exit the dashboard.
    Quit,
    /// Request cancellation of the watched task.
    Cancel,
    /// Nothing to do.
    None,
}

/// Apply an event received from the task monitor.
pub fn handle_monitor_event(task: &mut GenerationTask, connected: &mut bool, event: MonitorEvent) {
    match event {
        MonitorEvent::ChannelConnected => *connected = true,
        MonitorEvent::ChannelDisconnected => *connected = false,
        MonitorEvent::Action(action) => {
            let current = std::mem::take(task);
            *task = reduce(current, action);
        }
    }
}

/// Map a keyboard event to an app action.
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') => KeyAction::Cancel,
        _ => KeyAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pw_client::TaskAction;
    use pw_protocol::{Stage, TaskStatus};

    #[test]
    fn test_monitor_action_flows_through_reducer() {
        let mut task = GenerationTask::idle();
        let mut connected = false;

        handle_monitor_event(
            &mut task,
            &mut connected,
            MonitorEvent::Action(TaskAction::Start {
                task_id: "t1".to_string(),
                episode_id: "e1".to_string(),
            }),
        );
        assert_eq!(task.status, TaskStatus::Running);

        handle_monitor_event(
            &mut task,
            &mut connected,
            MonitorEvent::Action(TaskAction::UpdateProgress {
                stage: Stage::Render,
                progress: 40.0,
                message: None,
            }),
        );
        assert_eq!(task.current_stage, Some(Stage::Render));
    }

    #[test]
    fn test_connection_events_toggle_indicator() {
        let mut task = GenerationTask::idle();
        let mut connected = false;

        handle_monitor_event(&mut task, &mut connected, MonitorEvent::ChannelConnected);
        assert!(connected);

        handle_monitor_event(&mut task, &mut connected, MonitorEvent::ChannelDisconnected);
        assert!(!connected);

        // connection churn must not touch the task state
        assert_eq!(task, GenerationTask::idle());
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('q'))),
            KeyAction::Quit
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Esc)), KeyAction::Quit);
    }

    #[test]
    fn test_cancel_key() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('c'))),
            KeyAction::Cancel
        );
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('x'))),
            KeyAction::None
        );
    }
}
