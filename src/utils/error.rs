//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that make a log header unusable
///
/// Any of these aborts the run: without a resolved schema no record
/// on any line can be trusted.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("no header found before the first data line")]
    MissingHeader,

    #[error("header has no #fields directive")]
    MissingFields,

    #[error("header has no #types directive")]
    MissingTypes,

    #[error("header declares {fields} fields but {types} types")]
    FieldTypeMismatch { fields: usize, types: usize },

    #[error("invalid #separator value: {0}")]
    BadSeparator(String),
}

/// Errors on a single data line
///
/// These are recovered by skipping the line and counting it as unparsed;
/// they never abort a run.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("invalid {kind} value in field '{field}': {value}")]
    InvalidValue {
        field: String,
        kind: &'static str,
        value: String,
    },
}

/// Errors that can abort a whole analysis run
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("schema resolution failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during report file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("invalid output path: {0}")]
    InvalidPath(String),
}
