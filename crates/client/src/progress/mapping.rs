//! Wire message to task action translation.
//!
//! The live-update channel delivers raw [`ProgressMessage`]s; this module
//! decides what, if anything, each one means for the task state. Unknown
//! event kinds and structurally incomplete payloads (a progress event
//! without a stage, say) map to `None` and are dropped upstream.

use pw_protocol::{MessageKind, ProgressMessage};

use crate::progress::reducer::TaskAction;

/// Fallback error text when the server reports a failure without detail.
const UNKNOWN_ERROR: &str = "Unknown error";

/// Translate one live-update message into a task action.
pub fn action_for_message(message: &ProgressMessage) -> Option<TaskAction> {
    match message.kind() {
        MessageKind::Progress => {
            let stage = message.data.stage?;
            Some(TaskAction::UpdateProgress {
                stage,
                progress: message.data.stage_progress_value().unwrap_or(0.0),
                message: message.data.message.clone(),
            })
        }

        MessageKind::StageComplete => {
            let stage = message.data.stage?;
            Some(TaskAction::CompleteStage { stage })
        }

        MessageKind::Complete => Some(TaskAction::Complete {
            video_url: message.data.video_url.clone(),
        }),

        MessageKind::Error => Some(TaskAction::SetError {
            error: message
                .data
                .error
                .clone()
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        }),

        MessageKind::Cancelled => Some(TaskAction::Cancel),

        // Connection acknowledgements carry no state; unknown kinds are
        // tolerated and dropped.
        MessageKind::Connected | MessageKind::Unknown => None,
    }
}
