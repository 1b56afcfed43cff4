//! Task monitor: one supervising task per generation run.
//!
//! The monitor is the single owner of a task's event flow. It merges the
//! live-update channel with the REST status-poll fallback into one ordered
//! stream of [`MonitorEvent`]s, so the consumer (TUI, or any other state
//! holder) applies mutations from exactly one source. Channel and poll may
//! still observe the same fact; the reducer's last-write-wins semantics
//! absorb that.
//!
//! The poll fires on a fixed interval only while the last status the
//! monitor has seen is `running`, and stops on its own once the run turns
//! terminal. When a poll reports `completed`, the result endpoint is
//! fetched once to recover the video URL.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use pw_protocol::{GenerationStatus, TaskStatus};

use crate::channel::{wait_for_shutdown, ChannelConfig, ChannelEvent, TaskChannel};
use crate::error::ClientResult;
use crate::progress::{action_for_message, TaskAction};
use crate::rest::GenerationApi;

/// Timing knobs for the monitor.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Status poll cadence while the task is running.
    pub poll_interval: Duration,
    /// Live-update channel timing.
    pub channel: ChannelConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            channel: ChannelConfig::default(),
        }
    }
}

/// Events delivered to the monitor's consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    /// The live-update channel is up.
    ChannelConnected,
    /// The live-update channel dropped (it retries on its own).
    ChannelDisconnected,
    /// A task state mutation to apply through the reducer.
    Action(TaskAction),
}

/// Handle to a running task monitor.
pub struct TaskMonitor {
    channel: TaskChannel,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TaskMonitor {
    /// Start monitoring a task: opens the live-update channel and the poll
    /// loop, delivering events on `events_tx`.
    ///
    /// # Errors
    ///
    /// Fails only if a WebSocket URL cannot be derived from the server
    /// config; everything at runtime degrades instead of erroring.
    pub fn spawn(
        api: GenerationApi,
        task_id: String,
        config: MonitorConfig,
        events_tx: mpsc::Sender<MonitorEvent>,
    ) -> ClientResult<Self> {
        let ws_url = api.config().ws_task_url(&task_id)?;

        let (channel_tx, channel_rx) = mpsc::channel(64);
        let channel = TaskChannel::connect(ws_url, config.channel.clone(), channel_tx);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(monitor_loop(
            api,
            task_id,
            config.poll_interval,
            channel_rx,
            events_tx,
            shutdown_rx,
        ));

        Ok(Self {
            channel,
            shutdown_tx,
            handle,
        })
    }

    /// Tear down the poll loop and the live-update channel together.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.handle.await;
        self.channel.disconnect().await;
    }
}

async fn monitor_loop(
    api: GenerationApi,
    task_id: String,
    poll_interval: Duration,
    mut channel_rx: mpsc::Receiver<ChannelEvent>,
    events_tx: mpsc::Sender<MonitorEvent>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    // The monitor exists only for a started task.
    let mut status = TaskStatus::Running;

    let start = tokio::time::Instant::now() + poll_interval;
    let mut poll = tokio::time::interval_at(start, poll_interval);

    loop {
        tokio::select! {
            _ = wait_for_shutdown(&mut shutdown_rx) => return,

            event = channel_rx.recv() => {
                let forwarded = match event {
                    Some(ChannelEvent::Connected) => Some(MonitorEvent::ChannelConnected),
                    Some(ChannelEvent::Disconnected) => Some(MonitorEvent::ChannelDisconnected),
                    Some(ChannelEvent::Message(message)) => {
                        action_for_message(&message).map(|action| {
                            status = status_after(status, &action);
                            MonitorEvent::Action(action)
                        })
                    }
                    // Channel torn down underneath us.
                    None => return,
                };
                if let Some(event) = forwarded {
                    if events_tx.send(event).await.is_err() {
                        return;
                    }
                }
            }

            _ = poll.tick(), if status == TaskStatus::Running => {
                match api.status(&task_id).await {
                    Ok(remote) => {
                        if let Some(action) = action_for_poll(&api, &remote).await {
                            status = status_after(status, &action);
                            if events_tx.send(MonitorEvent::Action(action)).await.is_err() {
                                return;
                            }
                        }
                    }
                    Err(err) => {
                        // The poll is itself the fallback; nothing left to
                        // escalate to.
                        debug!("status poll for {task_id} failed: {err}");
                    }
                }
            }
        }
    }
}

/// Status the monitor should assume after emitting an action.
fn status_after(current: TaskStatus, action: &TaskAction) -> TaskStatus {
    match action {
        TaskAction::Complete { .. } => TaskStatus::Completed,
        TaskAction::SetError { .. } | TaskAction::FailStage { .. } => TaskStatus::Failed,
        TaskAction::Cancel => TaskStatus::Cancelled,
        TaskAction::Start { .. } => TaskStatus::Running,
        TaskAction::Reset => TaskStatus::Idle,
        TaskAction::UpdateProgress { .. } | TaskAction::CompleteStage { .. } => current,
    }
}

/// Map a polled status to a task action.
///
/// Polls only drive status-level transitions: the overall `progress`
/// figure in the response cannot be attributed to a stage, so it is not
/// synthesized into stage updates. On `completed` the result endpoint is
/// fetched once for the video URL; if that fetch fails the run still
/// completes, just without a URL.
async fn action_for_poll(api: &GenerationApi, remote: &GenerationStatus) -> Option<TaskAction> {
    match remote.status {
        TaskStatus::Completed => {
            let video_url = match api.result(&remote.task_id).await {
                Ok(result) => result.video_url,
                Err(err) => {
                    debug!("result fetch for {} failed: {err}", remote.task_id);
                    None
                }
            };
            Some(TaskAction::Complete { video_url })
        }
        TaskStatus::Failed => Some(TaskAction::SetError {
            error: remote
                .error
                .clone()
                .unwrap_or_else(|| remote.message.clone()),
        }),
        TaskStatus::Cancelled => Some(TaskAction::Cancel),
        TaskStatus::Running | TaskStatus::Idle => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tracking_follows_terminal_actions() {
        let running = TaskStatus::Running;

        assert_eq!(
            status_after(running, &TaskAction::Complete { video_url: None }),
            TaskStatus::Completed
        );
        assert_eq!(
            status_after(running, &TaskAction::SetError { error: "x".to_string() }),
            TaskStatus::Failed
        );
        assert_eq!(status_after(running, &TaskAction::Cancel), TaskStatus::Cancelled);
        assert_eq!(
            status_after(
                running,
                &TaskAction::CompleteStage {
                    stage: pw_protocol::Stage::Edit
                }
            ),
            TaskStatus::Running
        );
    }
}
