//! TUI widgets module.
//!
//! This module contains the widgets of the watch dashboard.

pub mod stage_table;
pub mod summary;

pub use stage_table::render_stage_table;
pub use summary::render_summary;
