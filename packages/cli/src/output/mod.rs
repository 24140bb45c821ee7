//! Output utilities for CLI errors
//!
//! Centralized error formatting so every failure is shown the same way
//! on stderr, with a hint where one helps.

pub mod colors;
pub mod errors;

pub use errors::{show_error, show_run_error};
