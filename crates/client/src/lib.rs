//! # pw-client
//!
//! Client engine for pipewatch: everything stateful between the generation
//! backend and a UI.
//!
//! This crate provides:
//! - The live-update WebSocket channel with automatic reconnection
//! - The generation-progress aggregator (pure reducer over task state)
//! - The REST client for start/status/result/cancel
//! - The task monitor wiring channel and poll fallback into one event flow
//!
//! ## Modules
//!
//! - [`channel`]: supervised live-update connection
//! - [`progress`]: task state machine and wire-message mapping
//! - [`rest`]: generation REST endpoints
//! - [`monitor`]: per-task event flow supervisor
//! - [`config`]: server endpoint configuration
//! - [`error`]: client error types

pub mod channel;
pub mod config;
pub mod error;
pub mod monitor;
pub mod progress;
pub mod rest;

pub use channel::{ChannelConfig, ChannelEvent, TaskChannel};
pub use config::ServerConfig;
pub use error::{ClientError, ClientResult};
pub use monitor::{MonitorConfig, MonitorEvent, TaskMonitor};
pub use progress::{action_for_message, overall_progress, reduce, TaskAction};
pub use rest::GenerationApi;
