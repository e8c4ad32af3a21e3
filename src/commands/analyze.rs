//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Opens the conn.log file
//! 2. Runs the analysis pipeline
//! 3. Writes the JSON report (if requested)
//! 4. Prints the text report

use crate::analyzer::analyze_log;
use crate::output::{render_text, write_report};
use crate::report::to_report;
use anyhow::{Context, Result};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Path to the conn.log file to analyze
    pub input: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Print the text report to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("conn.log"),
            output_json: None,
            print_summary: true,
        }
    }
}

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Analyze command arguments
///
/// # Returns
/// Ok if the analysis completes, Err with context if any step fails
///
/// # Errors
/// * Input file cannot be opened
/// * Log header is missing or unusable
/// * JSON report cannot be written
pub fn execute_analyze(args: AnalyzeArgs) -> Result<()> {
    let start_time = Instant::now();

    info!("Starting analysis of: {}", args.input.display());

    // Step 1: Open the log file
    info!("Step 1/4: Opening log file...");
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open log file {}", args.input.display()))?;
    let reader = BufReader::new(file);

    // Step 2: Run the pipeline
    info!("Step 2/4: Analyzing connection records...");
    let analysis = analyze_log(reader).context("Failed to analyze log")?;

    debug!(
        "Analyzed {} of {} records, {} half-duplex",
        analysis.counts.analyzed, analysis.counts.total, analysis.counts.half_duplex
    );

    // Step 3: Write the JSON report (if requested)
    if let Some(path) = &args.output_json {
        info!("Step 3/4: Writing JSON report...");
        let report = to_report(analysis.clone(), &args.input.to_string_lossy());
        write_report(&report, path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", path.display());
    } else {
        info!("Step 3/4: Skipping JSON report (not requested)");
    }

    // Step 4: Print the text report
    if args.print_summary {
        info!("Step 4/4: Rendering text report...");
        println!("{}", render_text(&analysis));
    } else {
        info!("Step 4/4: Skipping text report (quiet)");
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(())
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }

    if args.input.is_dir() {
        anyhow::bail!("Input path is a directory: {}", args.input.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_args_valid() {
        let temp_file = NamedTempFile::new().unwrap();
        let args = AnalyzeArgs {
            input: temp_file.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_validate_args_empty_path() {
        let args = AnalyzeArgs {
            input: PathBuf::new(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            input: temp_dir.path().join("no-such.log"),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let args = AnalyzeArgs {
            input: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_execute_analyze_writes_report() {
        let mut log_file = NamedTempFile::new().unwrap();
        writeln!(log_file, "#separator \\x09").unwrap();
        writeln!(log_file, "#fields\tid.orig_h\tproto\tlocal_orig\tlocal_resp\thistory").unwrap();
        writeln!(log_file, "#types\taddr\tenum\tbool\tbool\tstring").unwrap();
        writeln!(log_file, "10.0.0.1\ttcp\tT\tT\tSAD").unwrap();

        let temp_dir = tempfile::tempdir().unwrap();
        let json_path = temp_dir.path().join("report.json");

        let args = AnalyzeArgs {
            input: log_file.path().to_path_buf(),
            output_json: Some(json_path.clone()),
            print_summary: false,
        };

        execute_analyze(args).unwrap();

        let report = crate::output::read_report(&json_path).unwrap();
        assert_eq!(report.analysis.counts.total, 1);
        assert_eq!(report.analysis.counts.half_duplex, 1);
    }
}
