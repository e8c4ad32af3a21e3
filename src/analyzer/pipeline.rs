//! Pipeline driver: raw log lines in, analysis out.
//!
//! Resolves the header once, then streams every data line through the
//! parser into the aggregator. One forward pass; the correlation pass runs
//! inside `Aggregator::into_analysis` over the retained records.

use std::io::BufRead;

use log::{debug, warn};

use super::aggregate::Aggregator;
use crate::parser::{self, LogSchema};
use crate::report::Analysis;
use crate::utils::AnalyzeError;

/// Run the full analysis over a line source
///
/// **Public** - library entry point, wrapped by the analyze command
///
/// # Arguments
/// * `input` - Buffered reader over Zeek ASCII log text
///
/// # Returns
/// The completed analysis, or the schema/IO error that aborted the run
///
/// Header directives are collected until the first data line. A log with a
/// usable header and no data lines yields an all-zero analysis; a log with
/// no header at all is a schema error. Data lines that fail to parse are
/// logged, counted and skipped.
pub fn analyze_log<R: BufRead>(input: R) -> Result<Analysis, AnalyzeError> {
    let mut lines = input.lines();

    let mut header: Vec<String> = Vec::new();
    let mut first_data: Option<String> = None;
    for line in lines.by_ref() {
        let line = line?;
        if parser::is_data_line(&line) {
            first_data = Some(line);
            break;
        }
        if line.starts_with('#') {
            header.push(line);
        }
    }

    let schema = LogSchema::from_header(&header)?;
    debug!("Resolved log schema with {} fields", schema.field_count());

    let mut aggregator = Aggregator::new();
    if let Some(line) = first_data {
        consume(&mut aggregator, &line, &schema);
    }
    for line in lines {
        let line = line?;
        // Trailing directives like #close are not data
        if parser::is_data_line(&line) {
            consume(&mut aggregator, &line, &schema);
        }
    }

    Ok(aggregator.into_analysis())
}

/// Parse one data line and feed it to the aggregator
///
/// **Private** - parse failures are counted, never fatal
fn consume(aggregator: &mut Aggregator, line: &str, schema: &LogSchema) {
    match parser::parse_record(line, schema) {
        Ok(conn) => aggregator.observe(conn),
        Err(err) => {
            warn!("Skipping unparsable line: {}", err);
            aggregator.record_unparsed();
        }
    }
}
