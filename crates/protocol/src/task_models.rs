//! Generation task state models.
//!
//! A `GenerationTask` is the client-held record of one pipeline run for one
//! episode. It is populated by live-update events (or REST polling) until a
//! terminal event arrives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stage_models::{Stage, StageInfo};

/// Lifecycle status of a generation task.
///
/// Status moves forward only: Idle -> Running -> {Completed | Failed |
/// Cancelled}. Reset returns any state to Idle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// No run in flight.
    Idle,
    /// The backend is executing the pipeline.
    Running,
    /// The run finished successfully.
    Completed,
    /// The run failed.
    Failed,
    /// The run was cancelled by the user.
    Cancelled,
}

impl TaskStatus {
    /// Whether no further progress events are expected.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Completed | TaskStatus::Failed | TaskStatus::Cancelled
        )
    }
}

/// Client-side state of a single pipeline run.
///
/// Overall progress is never stored here; it is always recomputed from the
/// stage map (see `pw-client`'s progress module).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GenerationTask {
    /// Task identifier assigned by the backend on start.
    pub task_id: Option<String>,

    /// Episode this run belongs to.
    pub episode_id: Option<String>,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// The stage most recently reported as in progress.
    pub current_stage: Option<Stage>,

    /// Per-stage progress, keyed in pipeline order.
    #[ts(type = "Record<string, StageInfo>")]
    pub stages: BTreeMap<Stage, StageInfo>,

    /// Location of the resulting video once the run completes.
    pub video_url: Option<String>,

    /// Error text once the run fails.
    pub error: Option<String>,
}

impl GenerationTask {
    /// A fresh idle task: no identifiers, all stages pending at zero.
    pub fn idle() -> Self {
        let stages = Stage::PRODUCTIVE
            .iter()
            .map(|&stage| (stage, StageInfo::pending(stage)))
            .collect();

        Self {
            task_id: None,
            episode_id: None,
            status: TaskStatus::Idle,
            current_stage: None,
            stages,
            video_url: None,
            error: None,
        }
    }
}

impl Default for GenerationTask {
    fn default() -> Self {
        Self::idle()
    }
}
