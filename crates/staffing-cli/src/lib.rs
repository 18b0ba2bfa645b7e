//! CLI library components for the ward staffing tool.

pub mod logging;
pub mod summary;
