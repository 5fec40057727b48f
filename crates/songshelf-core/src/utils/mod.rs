//! Utility functions for display formatting.

pub mod format;

pub use format::{format_date, format_duration, preview_text, truncate_string};
