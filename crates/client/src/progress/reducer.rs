//! Task state machine implementation.
//!
//! This module provides the pure reducer for [`GenerationTask`] and the
//! derived overall-progress computation. All operations are total: the
//! reducer never panics and never rejects input, it only ignores what
//! cannot apply (events for sentinel stages, anything after a terminal
//! state except a reset).

use pw_protocol::{GenerationTask, Stage, StageStatus, TaskStatus};

/// A mutation of the task state.
///
/// Actions arrive from the live-update channel, the REST poll fallback, or
/// the user (cancel/reset); the reducer does not care which, and tolerates
/// duplicates and reordering.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskAction {
    /// Begin a new run: resets all stage state and records identifiers.
    Start {
        task_id: String,
        episode_id: String,
    },

    /// A stage reported progress.
    UpdateProgress {
        stage: Stage,
        progress: f64,
        message: Option<String>,
    },

    /// A stage finished. Idempotent.
    CompleteStage { stage: Stage },

    /// A stage failed; terminal for the run.
    FailStage { stage: Stage, error: String },

    /// The run failed without a stage attribution; terminal.
    SetError { error: String },

    /// The run finished successfully; terminal.
    Complete { video_url: Option<String> },

    /// The user cancelled the run; terminal.
    Cancel,

    /// Discard the run and return to idle.
    Reset,
}

/// Apply one action to the task state.
///
/// In a terminal state only [`TaskAction::Reset`] and [`TaskAction::Start`]
/// (which is a reset-and-run) have any effect; late events from a channel
/// that is still listening are inert.
pub fn reduce(task: GenerationTask, action: TaskAction) -> GenerationTask {
    match action {
        TaskAction::Reset => GenerationTask::idle(),

        TaskAction::Start {
            task_id,
            episode_id,
        } => {
            let mut next = GenerationTask::idle();
            next.task_id = Some(task_id);
            next.episode_id = Some(episode_id);
            next.status = TaskStatus::Running;
            next
        }

        _ if task.status.is_terminal() => task,

        TaskAction::UpdateProgress {
            stage,
            progress,
            message,
        } => {
            let mut next = task;
            if let Some(info) = next.stages.get_mut(&stage) {
                // Late events must not corrupt a stage that already
                // finished.
                if info.status != StageStatus::Completed {
                    info.status = StageStatus::InProgress;
                    info.progress = progress;
                    info.message = message;
                    next.current_stage = Some(stage);
                }
            }
            next
        }

        TaskAction::CompleteStage { stage } => {
            let mut next = task;
            if let Some(info) = next.stages.get_mut(&stage) {
                info.status = StageStatus::Completed;
                info.progress = 100.0;
            }
            next
        }

        TaskAction::FailStage { stage, error } => {
            let mut next = task;
            if let Some(info) = next.stages.get_mut(&stage) {
                info.status = StageStatus::Failed;
                info.message = Some(error.clone());
            }
            next.status = TaskStatus::Failed;
            next.error = Some(error);
            next
        }

        TaskAction::SetError { error } => {
            let mut next = task;
            next.status = TaskStatus::Failed;
            next.error = Some(error);
            next
        }

        TaskAction::Complete { video_url } => {
            let mut next = task;
            next.status = TaskStatus::Completed;
            if video_url.is_some() {
                next.video_url = video_url;
            }
            // Terminal success force-completes the productive stages that
            // did not fail, so the overall figure reads 100 even when the
            // server skipped some stage_complete events.
            for info in next.stages.values_mut() {
                if info.status != StageStatus::Failed {
                    info.status = StageStatus::Completed;
                    info.progress = 100.0;
                }
            }
            next
        }

        TaskAction::Cancel => {
            let mut next = task;
            next.status = TaskStatus::Cancelled;
            next
        }
    }
}

/// Weighted overall completion percentage, 0-100.
///
/// A completed stage contributes its full weight, an in-progress stage
/// contributes `weight * progress / 100`, and pending or failed stages
/// contribute nothing. Sentinel stages never appear in the map.
pub fn overall_progress(task: &GenerationTask) -> f64 {
    let mut total_weight = 0u32;
    let mut completed_weight = 0.0f64;

    for (stage, info) in &task.stages {
        let weight = stage.weight();
        if weight == 0 {
            continue;
        }
        total_weight += weight;
        completed_weight += match info.status {
            StageStatus::Completed => f64::from(weight),
            StageStatus::InProgress => f64::from(weight) * (info.progress / 100.0),
            StageStatus::Pending | StageStatus::Failed => 0.0,
        };
    }

    if total_weight == 0 {
        0.0
    } else {
        completed_weight / f64::from(total_weight) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> GenerationTask {
        reduce(
            GenerationTask::idle(),
            TaskAction::Start {
                task_id: "t1".to_string(),
                episode_id: "e1".to_string(),
            },
        )
    }

    #[test]
    fn test_start_resets_and_runs() {
        let task = started();
        assert_eq!(task.status, TaskStatus::Running);
        assert_eq!(task.task_id.as_deref(), Some("t1"));
        assert_eq!(task.episode_id.as_deref(), Some("e1"));
        assert_eq!(overall_progress(&task), 0.0);
    }

    #[test]
    fn test_weighted_progress_for_single_stage() {
        // render carries weight 25; at 40% it contributes 10 points
        let task = reduce(
            started(),
            TaskAction::UpdateProgress {
                stage: Stage::Render,
                progress: 40.0,
                message: None,
            },
        );
        assert_eq!(overall_progress(&task), 10.0);
        assert_eq!(task.current_stage, Some(Stage::Render));

        let task = reduce(task, TaskAction::CompleteStage { stage: Stage::Render });
        assert_eq!(overall_progress(&task), 25.0);
    }

    #[test]
    fn test_complete_stage_is_idempotent() {
        let task = reduce(started(), TaskAction::CompleteStage { stage: Stage::Voice });
        let progress = overall_progress(&task);

        let again = reduce(task.clone(), TaskAction::CompleteStage { stage: Stage::Voice });
        assert_eq!(again, task);
        assert_eq!(overall_progress(&again), progress);
    }

    #[test]
    fn test_late_update_does_not_corrupt_completed_stage() {
        let task = reduce(started(), TaskAction::CompleteStage { stage: Stage::Script });
        let task = reduce(
            task,
            TaskAction::UpdateProgress {
                stage: Stage::Script,
                progress: 30.0,
                message: Some("stale".to_string()),
            },
        );

        let info = &task.stages[&Stage::Script];
        assert_eq!(info.status, StageStatus::Completed);
        assert_eq!(info.progress, 100.0);
        assert_eq!(overall_progress(&task), 5.0);
    }

    #[test]
    fn test_out_of_order_stages_still_sum_consistently() {
        // Events for later stages arriving before earlier ones finish
        let task = reduce(started(), TaskAction::CompleteStage { stage: Stage::Edit });
        let task = reduce(
            task,
            TaskAction::UpdateProgress {
                stage: Stage::Script,
                progress: 50.0,
                message: None,
            },
        );

        // edit 5 + script 5 * 0.5 = 7.5
        assert_eq!(overall_progress(&task), 7.5);
    }

    #[test]
    fn test_progress_stays_in_bounds_across_full_run() {
        let mut task = started();
        let mut last = overall_progress(&task);

        for stage in Stage::PRODUCTIVE {
            for step in [25.0, 50.0, 75.0] {
                task = reduce(
                    task,
                    TaskAction::UpdateProgress {
                        stage,
                        progress: step,
                        message: None,
                    },
                );
                let now = overall_progress(&task);
                assert!((0.0..=100.0).contains(&now));
                assert!(now >= last);
                last = now;
            }
            task = reduce(task, TaskAction::CompleteStage { stage });
        }

        assert_eq!(overall_progress(&task), 100.0);
    }

    #[test]
    fn test_fail_stage_fails_the_run() {
        let task = reduce(
            started(),
            TaskAction::FailStage {
                stage: Stage::Lipsync,
                error: "GPU out of memory".to_string(),
            },
        );

        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.as_deref(), Some("GPU out of memory"));
        assert_eq!(task.stages[&Stage::Lipsync].status, StageStatus::Failed);
        // failed stage contributes nothing
        assert_eq!(overall_progress(&task), 0.0);
    }

    #[test]
    fn test_complete_forces_remaining_stages_to_full() {
        let task = reduce(started(), TaskAction::CompleteStage { stage: Stage::Render });
        let task = reduce(
            task,
            TaskAction::Complete {
                video_url: Some("https://x/y.mp4".to_string()),
            },
        );

        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.video_url.as_deref(), Some("https://x/y.mp4"));
        assert_eq!(overall_progress(&task), 100.0);
    }

    #[test]
    fn test_terminal_state_ignores_further_events() {
        let task = reduce(started(), TaskAction::Cancel);
        assert_eq!(task.status, TaskStatus::Cancelled);

        let after = reduce(
            task.clone(),
            TaskAction::UpdateProgress {
                stage: Stage::Video,
                progress: 80.0,
                message: None,
            },
        );
        assert_eq!(after, task);

        let after = reduce(task.clone(), TaskAction::SetError {
            error: "late".to_string(),
        });
        assert_eq!(after, task);
    }

    #[test]
    fn test_reset_restores_exact_idle_state() {
        let mut task = started();
        task = reduce(
            task,
            TaskAction::UpdateProgress {
                stage: Stage::Video,
                progress: 60.0,
                message: Some("rendering".to_string()),
            },
        );
        task = reduce(task, TaskAction::SetError {
            error: "boom".to_string(),
        });

        let task = reduce(task, TaskAction::Reset);
        assert_eq!(task, GenerationTask::idle());
        assert_eq!(overall_progress(&task), 0.0);
    }

    #[test]
    fn test_reducer_ignores_sentinel_stage_events() {
        let task = started();
        let after = reduce(
            task.clone(),
            TaskAction::UpdateProgress {
                stage: Stage::Complete,
                progress: 50.0,
                message: None,
            },
        );
        assert_eq!(after, task);
    }
}
