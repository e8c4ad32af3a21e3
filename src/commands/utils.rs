use anyhow::Result;
use std::path::PathBuf;
use crate::output::read_report;
use crate::utils::config::REPORT_VERSION;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Total conns: {}", report.analysis.counts.total);
    println!("  Analyzed conns: {}", report.analysis.counts.analyzed);
    println!("  Half-duplex conns: {}", report.analysis.counts.half_duplex);
    println!("  Correlated pairs: {}", report.analysis.correlation.pairs);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Conn Doctor Report Schema");
    println!("Current Version: {}", REPORT_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string     - RFC 3339 timestamp");
        println!("  source: string           - Input log path");
        println!("  analysis: object         - Analysis results");
        println!("    counts: object         - Headline counters");
        println!("      total: number        - All records in the log");
        println!("      local_tcp: number    - Local orig/resp TCP records");
        println!("      analyzed: number     - Records passing eligibility");
        println!("      half_duplex: number  - One-sided records");
        println!("      uppercase: number    - Originator-only records");
        println!("      lowercase: number    - Responder-only records");
        println!("      unparsed_lines: number - Skipped data lines");
        println!("    history_types: array   - Top half-duplex history types");
        println!("    ip_pairs: array        - Top IP address pairs");
        println!("    nodes: array           - Breakdown by capture node");
        println!("    processes: array       - Breakdown by sensor process");
        println!("    correlation: object    - Reverse-flow match summary");
        println!("      matched: number      - Records matched to a reverse");
        println!("      pairs: number        - Matched pairs");
        println!("      history_types: array - Top history types of pair seeds");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Conn Doctor v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", REPORT_VERSION);
    println!();
    println!("Half-duplex capture diagnosis for Zeek conn.log files.");
}
