//! Log parsing and schema resolution.
//!
//! This module handles:
//! - Resolving a log's layout from its Zeek ASCII header
//! - Parsing delimited data lines into typed records
//! - Classifying data vs comment/blank lines

pub mod conn;
pub mod header;

// Re-export main types
pub use conn::{is_data_line, parse_record, Conn, Proto};
pub use header::{Field, FieldType, LogSchema};
