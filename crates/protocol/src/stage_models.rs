//! Generation pipeline stage models.
//!
//! This module defines the stages of the video generation pipeline and the
//! per-stage progress state tracked by the client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One step of the video generation pipeline.
///
/// The eight productive stages run sequentially on the backend:
/// script parsing, character generation, storyboard planning, image
/// rendering, video rendering, voice synthesis, lip-sync, and final edit.
/// `Complete` and `Failed` are sentinel values that appear in wire messages
/// but never contribute to progress.
///
/// Variant order matches pipeline order, so the derived `Ord` sorts stages
/// the way the backend executes them.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, TS,
)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Script parsing.
    Script,
    /// Character generation.
    Character,
    /// Storyboard planning.
    Storyboard,
    /// Image rendering.
    Render,
    /// Video rendering.
    Video,
    /// Voice synthesis.
    Voice,
    /// Lip synchronization.
    Lipsync,
    /// Final edit.
    Edit,
    /// Sentinel: the whole run finished.
    Complete,
    /// Sentinel: the whole run failed.
    Failed,
}

impl Stage {
    /// The eight productive stages, in pipeline order.
    pub const PRODUCTIVE: [Stage; 8] = [
        Stage::Script,
        Stage::Character,
        Stage::Storyboard,
        Stage::Render,
        Stage::Video,
        Stage::Voice,
        Stage::Lipsync,
        Stage::Edit,
    ];

    /// Fixed contribution of this stage to overall completion percentage.
    ///
    /// Productive stage weights sum to 100; sentinels carry weight 0.
    pub fn weight(self) -> u32 {
        match self {
            Stage::Script => 5,
            Stage::Character => 10,
            Stage::Storyboard => 5,
            Stage::Render => 25,
            Stage::Video => 25,
            Stage::Voice => 10,
            Stage::Lipsync => 15,
            Stage::Edit => 5,
            Stage::Complete | Stage::Failed => 0,
        }
    }

    /// Human-readable stage name for display.
    pub fn display_name(self) -> &'static str {
        match self {
            Stage::Script => "Script parsing",
            Stage::Character => "Character generation",
            Stage::Storyboard => "Storyboard planning",
            Stage::Render => "Image rendering",
            Stage::Video => "Video rendering",
            Stage::Voice => "Voice synthesis",
            Stage::Lipsync => "Lip sync",
            Stage::Edit => "Final edit",
            Stage::Complete => "Complete",
            Stage::Failed => "Failed",
        }
    }

    /// Whether this stage contributes to overall progress.
    pub fn is_productive(self) -> bool {
        self.weight() > 0
    }
}

/// Progress state of a single stage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage has not started yet.
    Pending,
    /// Stage is currently executing.
    InProgress,
    /// Stage finished successfully.
    Completed,
    /// Stage reported an error.
    Failed,
}

/// Per-stage progress record held by the client.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct StageInfo {
    /// Display name of the stage.
    pub name: String,

    /// Stage-local progress, 0-100. The aggregator stores whatever the
    /// server sent; clamping is a render-time concern.
    pub progress: f64,

    /// Current status of the stage.
    pub status: StageStatus,

    /// Optional human-readable progress message from the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StageInfo {
    /// A fresh pending record for the given stage.
    pub fn pending(stage: Stage) -> Self {
        Self {
            name: stage.display_name().to_string(),
            progress: 0.0,
            status: StageStatus::Pending,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_productive_weights_sum_to_100() {
        let total: u32 = Stage::PRODUCTIVE.iter().map(|s| s.weight()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_sentinels_carry_no_weight() {
        assert_eq!(Stage::Complete.weight(), 0);
        assert_eq!(Stage::Failed.weight(), 0);
        assert!(!Stage::Complete.is_productive());
        assert!(!Stage::Failed.is_productive());
    }

    #[test]
    fn test_stage_serializes_snake_case() {
        let json = serde_json::to_string(&Stage::Lipsync).unwrap();
        assert_eq!(json, "\"lipsync\"");

        let stage: Stage = serde_json::from_str("\"storyboard\"").unwrap();
        assert_eq!(stage, Stage::Storyboard);
    }

    #[test]
    fn test_stage_order_matches_pipeline_order() {
        let mut stages = vec![Stage::Edit, Stage::Script, Stage::Render];
        stages.sort();
        assert_eq!(stages, vec![Stage::Script, Stage::Render, Stage::Edit]);
    }

    #[test]
    fn test_pending_stage_info() {
        let info = StageInfo::pending(Stage::Voice);
        assert_eq!(info.name, "Voice synthesis");
        assert_eq!(info.progress, 0.0);
        assert_eq!(info.status, StageStatus::Pending);
        assert!(info.message.is_none());
    }
}
