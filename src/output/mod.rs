//! Output writers for analysis results.
//!
//! This module handles the two report forms:
//! - JSON report documents (write, read back)
//! - Human-readable text summaries for stdout

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{read_report, report_to_string, write_report};
pub use text::render_text;
