//! # pw-protocol
//!
//! Core protocol definitions and data models for pipewatch.
//!
//! This crate defines all shared data structures used for:
//! - Pipeline stage and task state tracking
//! - The JSON-over-WebSocket live-update wire format
//! - REST request/response bodies for the generation endpoints
//!
//! ## Modules
//!
//! - [`stage_models`]: Pipeline stages, weights, and per-stage progress
//! - [`task_models`]: Task lifecycle status and the client-held run state
//! - [`wire`]: Live-update channel message format
//! - [`api_models`]: REST DTOs for start/status/result/cancel
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde, ts-rs, and chrono
//! - TypeScript generation: all types derive `TS` for the dashboard client
//! - Independent compilation: no dependencies on other pipewatch crates

pub mod api_models;
pub mod stage_models;
pub mod task_models;
pub mod wire;

// Re-export all public types for convenience
pub use api_models::*;
pub use stage_models::*;
pub use task_models::*;
pub use wire::*;
