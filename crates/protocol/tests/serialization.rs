use pw_protocol::*;

#[test]
fn test_progress_frame_deserialization() {
    // A frame as the backend publishes it for a stage progress update
    let json = r#"{
        "type": "progress",
        "task_id": "task-123",
        "data": {
            "stage": "render",
            "progress": 35.0,
            "stage_progress": 40.0,
            "total_progress": 18.5,
            "message": "Rendering shot 3/8",
            "details": {"shot": 3, "total": 8}
        },
        "timestamp": "2024-01-01T00:00:00Z"
    }"#;

    let msg: ProgressMessage = serde_json::from_str(json).expect("Failed to parse progress frame");

    assert_eq!(msg.kind(), MessageKind::Progress);
    assert_eq!(msg.task_id.as_deref(), Some("task-123"));
    assert_eq!(msg.data.stage, Some(Stage::Render));
    assert_eq!(msg.data.stage_progress_value(), Some(40.0));
    assert_eq!(msg.data.message.as_deref(), Some("Rendering shot 3/8"));
}

#[test]
fn test_stage_complete_frame_deserialization() {
    let json = r#"{
        "type": "stage_complete",
        "task_id": "task-123",
        "data": {"stage": "voice"},
        "timestamp": "2024-01-01T00:05:00Z"
    }"#;

    let msg: ProgressMessage = serde_json::from_str(json).expect("Failed to parse frame");
    assert_eq!(msg.kind(), MessageKind::StageComplete);
    assert_eq!(msg.data.stage, Some(Stage::Voice));
}

#[test]
fn test_complete_frame_carries_video_url() {
    let json = r#"{
        "type": "complete",
        "task_id": "task-123",
        "data": {
            "video_path": "/data/output/e1.mp4",
            "video_url": "https://media.example/e1.mp4"
        },
        "timestamp": "2024-01-01T00:30:00Z"
    }"#;

    let msg: ProgressMessage = serde_json::from_str(json).expect("Failed to parse frame");
    assert_eq!(msg.kind(), MessageKind::Complete);
    assert_eq!(
        msg.data.video_url.as_deref(),
        Some("https://media.example/e1.mp4")
    );
}

#[test]
fn test_unknown_event_type_still_parses() {
    // Servers may add event kinds; parsing must not fail on them
    let json = r#"{
        "type": "gpu_telemetry",
        "data": {"details": {"vram": 12}},
        "timestamp": "2024-01-01T00:00:00Z"
    }"#;

    let msg: ProgressMessage = serde_json::from_str(json).expect("Failed to parse frame");
    assert_eq!(msg.kind(), MessageKind::Unknown);
    assert!(msg.task_id.is_none());
}

#[test]
fn test_error_frame_deserialization() {
    let json = r#"{
        "type": "error",
        "task_id": "task-123",
        "data": {"stage": "lipsync", "error": "GPU out of memory"},
        "timestamp": "2024-01-01T00:12:00Z"
    }"#;

    let msg: ProgressMessage = serde_json::from_str(json).expect("Failed to parse frame");
    assert_eq!(msg.kind(), MessageKind::Error);
    assert_eq!(msg.data.error.as_deref(), Some("GPU out of memory"));
    assert_eq!(msg.data.stage, Some(Stage::Lipsync));
}

#[test]
fn test_generation_task_serialization_roundtrip() {
    let task = GenerationTask::idle();
    let json = serde_json::to_string(&task).expect("Failed to serialize GenerationTask");
    let deserialized: GenerationTask =
        serde_json::from_str(&json).expect("Failed to deserialize GenerationTask");

    assert_eq!(deserialized, task);
}

#[test]
fn test_task_status_wire_values() {
    assert_eq!(serde_json::to_string(&TaskStatus::Idle).unwrap(), "\"idle\"");
    assert_eq!(
        serde_json::to_string(&TaskStatus::Cancelled).unwrap(),
        "\"cancelled\""
    );
    let status: TaskStatus = serde_json::from_str("\"failed\"").unwrap();
    assert_eq!(status, TaskStatus::Failed);
}

#[test]
fn test_generation_result_with_missing_optionals() {
    let json = r#"{
        "success": true,
        "episode_id": "e1",
        "stages": {}
    }"#;

    let result: GenerationResult = serde_json::from_str(json).expect("Failed to parse result");
    assert!(result.success);
    assert!(result.video_url.is_none());
    assert!(result.duration.is_none());
}
