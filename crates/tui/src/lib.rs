//! # pw-tui
//!
//! Terminal dashboard for pipewatch.
//!
//! This crate renders the live state of one generation run: an overall
//! progress gauge, a per-stage table, and cancel/quit key bindings. It
//! consumes the event flow produced by `pw-client`'s task monitor and
//! holds task state exclusively through the reducer.

pub mod app;
pub mod event_handler;
pub mod tui;
pub mod widgets;

pub use app::App;
pub use tui::Tui;

use anyhow::Result;
use pw_client::{GenerationApi, MonitorConfig, TaskMonitor};
use tokio::sync::mpsc;

/// Watch one task in the terminal until it finishes or the user quits.
///
/// Spawns the task monitor, runs the dashboard event loop, and tears both
/// down together. The terminal is restored even when the loop errors.
pub async fn run_watch(api: GenerationApi, task_id: String, episode_id: String) -> Result<()> {
    let (events_tx, events_rx) = mpsc::channel(64);
    let monitor = TaskMonitor::spawn(
        api.clone(),
        task_id.clone(),
        MonitorConfig::default(),
        events_tx.clone(),
    )?;

    let mut app = App::new(api, task_id, episode_id, events_rx, events_tx);

    let mut tui = Tui::init()?;
    let result = app.run(&mut tui).await;
    let restore = tui.restore();

    monitor.shutdown().await;

    result?;
    restore
}
