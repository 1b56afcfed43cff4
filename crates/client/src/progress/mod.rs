//! Generation progress aggregation.
//!
//! The aggregator owns the semantics of [`GenerationTask`]: every mutation
//! is a pure reducer over `(task, action)`, and the overall completion
//! percentage is always derived from the stage map, never stored.
//!
//! ## Modules
//!
//! - [`reducer`]: task actions and the pure state transition function
//! - [`mapping`]: translation from wire messages to task actions

pub mod mapping;
pub mod reducer;

pub use mapping::action_for_message;
pub use reducer::{overall_progress, reduce, TaskAction};
