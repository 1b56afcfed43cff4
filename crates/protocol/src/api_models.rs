//! REST request and response models.
//!
//! These mirror the backend's generation endpoints: start, status, result,
//! and cancel. Only the shapes the client consumes are modeled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::stage_models::Stage;
use crate::task_models::TaskStatus;

/// Request body for starting a generation run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GenerationRequest {
    /// Episode to generate a video for.
    pub episode_id: String,

    /// Inline script text; the backend falls back to the stored episode
    /// script when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_input: Option<String>,

    /// Visual style preset name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Whether to burn subtitles into the final edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_subtitles: Option<bool>,

    /// Background music file path on the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_path: Option<String>,

    /// Background music volume, 0.0-1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bgm_volume: Option<f64>,

    /// Re-run the pipeline starting from this stage, reusing earlier
    /// artifacts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regenerate_from: Option<Stage>,
}

impl GenerationRequest {
    /// A minimal request for the given episode.
    pub fn for_episode(episode_id: impl Into<String>) -> Self {
        Self {
            episode_id: episode_id.into(),
            script_input: None,
            style: None,
            add_subtitles: None,
            bgm_path: None,
            bgm_volume: None,
            regenerate_from: None,
        }
    }
}

/// Response to start and cancel requests.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GenerationResponse {
    /// Backend-assigned task identifier.
    pub task_id: String,

    /// Episode the task belongs to.
    pub episode_id: String,

    /// Status string as reported by the backend.
    pub status: String,

    /// Human-readable acknowledgement.
    pub message: String,
}

/// Polled task status (the REST fallback while the channel is down).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GenerationStatus {
    /// Backend-assigned task identifier.
    pub task_id: String,

    /// Episode the task belongs to.
    pub episode_id: String,

    /// Current lifecycle status.
    pub status: TaskStatus,

    /// Server-computed overall progress, 0-100.
    pub progress: f64,

    /// Stage currently executing, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<Stage>,

    /// Human-readable status message.
    pub message: String,

    /// Free-form result summary once available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "Record<string, unknown> | null")]
    pub result: Option<serde_json::Value>,

    /// Error text if the task failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// When the backend started the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    /// When the run reached a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Final result of a completed run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct GenerationResult {
    /// Whether the run produced a video.
    pub success: bool,

    /// Episode the run belonged to.
    pub episode_id: String,

    /// Server-local path of the video file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_path: Option<String>,

    /// Public URL of the video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,

    /// Video duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Per-stage artifact summary.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub stages: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_request_serializes_without_optionals() {
        let request = GenerationRequest::for_episode("ep-1");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["episode_id"], "ep-1");
        assert!(json.get("style").is_none());
        assert!(json.get("regenerate_from").is_none());
    }

    #[test]
    fn test_status_roundtrip() {
        let json = r#"{
            "task_id": "t1",
            "episode_id": "e1",
            "status": "running",
            "progress": 42.5,
            "current_stage": "video",
            "message": "Rendering video",
            "started_at": "2024-01-01T00:00:00Z"
        }"#;

        let status: GenerationStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.status, TaskStatus::Running);
        assert_eq!(status.current_stage, Some(Stage::Video));
        assert_eq!(status.progress, 42.5);
        assert!(status.completed_at.is_none());
    }
}
