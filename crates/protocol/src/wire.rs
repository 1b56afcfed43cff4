//! Live-update wire format.
//!
//! The backend pushes UTF-8 text frames over a per-task WebSocket endpoint.
//! Each frame is one JSON object:
//!
//! ```json
//! {
//!   "type": "progress",
//!   "task_id": "abc123",
//!   "data": {
//!     "stage": "render",
//!     "stage_progress": 40.0,
//!     "message": "Rendering shot 3/8"
//!   },
//!   "timestamp": "2024-01-01T00:00:00Z"
//! }
//! ```
//!
//! The `type` field is an open set: servers may add new event kinds at any
//! time, so it is carried as a string and interpreted through
//! [`ProgressMessage::kind`], which maps unrecognized values to
//! [`MessageKind::Unknown`] instead of failing deserialization.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stage_models::Stage;

/// Interpreted event kind of a wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Connection acknowledgement sent by the server on accept.
    Connected,
    /// A stage made progress.
    Progress,
    /// A stage finished.
    StageComplete,
    /// The whole run finished successfully.
    Complete,
    /// The run failed.
    Error,
    /// The run was cancelled.
    Cancelled,
    /// Any event kind this client does not recognize.
    Unknown,
}

/// One event frame from the live-update channel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ProgressMessage {
    /// Raw event kind string, e.g. `"progress"` or `"stage_complete"`.
    #[serde(rename = "type")]
    pub event_type: String,

    /// Task this event belongs to, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Event payload; which fields are present depends on the kind.
    pub data: ProgressPayload,

    /// Server-side timestamp (ISO-8601 text, taken as-is).
    pub timestamp: String,
}

impl ProgressMessage {
    /// Interpret the raw `type` string.
    pub fn kind(&self) -> MessageKind {
        match self.event_type.as_str() {
            "connected" => MessageKind::Connected,
            "progress" => MessageKind::Progress,
            "stage_complete" => MessageKind::StageComplete,
            "complete" => MessageKind::Complete,
            "error" => MessageKind::Error,
            "cancelled" => MessageKind::Cancelled,
            _ => MessageKind::Unknown,
        }
    }
}

/// Payload of a live-update event.
///
/// All fields are optional on the wire; consumers pick what they need per
/// event kind and ignore the rest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, TS)]
pub struct ProgressPayload {
    /// Stage the event refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,

    /// Stage-local progress, 0-100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    /// Stage-local progress under its newer field name; preferred over
    /// `progress` when both are present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_progress: Option<f64>,

    /// Server-computed overall progress. Informational only; the client
    /// derives its own overall figure from the stage map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_progress: Option<f64>,

    /// Human-readable progress message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Free-form extra detail from the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "Record<string, unknown> | null")]
    pub details: Option<serde_json::Value>,

    /// Error text on `error` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Server-local path of the finished video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,

    /// Public URL of the finished video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl ProgressPayload {
    /// Stage-local progress with the field preference applied.
    pub fn stage_progress_value(&self) -> Option<f64> {
        self.stage_progress.or(self.progress)
    }
}
