//! Human-readable text report.
//!
//! Renders an [`Analysis`] as the line-oriented summary the analyze
//! command prints to stdout: headline counts, the ranked tables, and the
//! reverse-flow correlation section.

use crate::analyzer::percentage;
use crate::report::{Analysis, BreakdownEntry};

/// Render the full text report
///
/// **Public** - the analyze command prints this to stdout
///
/// # Arguments
/// * `analysis` - Completed analysis to render
///
/// # Returns
/// The report as one newline-joined string, without a trailing newline
pub fn render_text(analysis: &Analysis) -> String {
    let counts = &analysis.counts;
    let mut lines: Vec<String> = Vec::new();

    lines.push("Summary:".to_string());
    lines.push(format!("* {} total conns", group_digits(counts.total)));
    lines.push(format!(
        "* {} total local orig/local resp TCP conns",
        group_digits(counts.local_tcp)
    ));
    lines.push(format!(
        "* {} local TCP conns with history, {:.1}% of the total (analyzed conns)",
        group_digits(counts.analyzed),
        percentage(counts.analyzed, counts.total)
    ));
    lines.push(format!(
        "* {} half-duplex conns, {:.1}% of the analyzed conns and {:.1}% of the total conns",
        group_digits(counts.half_duplex),
        percentage(counts.half_duplex, counts.analyzed),
        percentage(counts.half_duplex, counts.total)
    ));
    lines.push(format!(
        "* {} ({:.1}%) of these are lowercase, and {} ({:.1}%) are uppercase",
        group_digits(counts.lowercase),
        percentage(counts.lowercase, counts.half_duplex),
        group_digits(counts.uppercase),
        percentage(counts.uppercase, counts.half_duplex)
    ));
    if counts.unparsed_lines > 0 {
        lines.push(format!(
            "* {} malformed lines skipped",
            group_digits(counts.unparsed_lines)
        ));
    }

    lines.push(String::new());
    lines.push("Top ten half-duplex history types:".to_string());
    for entry in &analysis.history_types {
        lines.push(format!(
            "* {} - {} ({:.1}%)",
            entry.history,
            group_digits(entry.count),
            entry.percentage
        ));
    }

    lines.push(String::new());
    lines.push("Top IP address pairs:".to_string());
    for entry in &analysis.ip_pairs {
        lines.push(format!(
            "* {} and {} - {} ({:.1}%)",
            entry.addr_a,
            entry.addr_b,
            group_digits(entry.count),
            entry.percentage
        ));
    }

    lines.push(String::new());
    lines.push("Half-duplex connections by capture node:".to_string());
    push_breakdown(&mut lines, &analysis.nodes);

    lines.push(String::new());
    lines.push("Half-duplex connections by sensor process:".to_string());
    push_breakdown(&mut lines, &analysis.processes);

    lines.push(String::new());
    lines.push("Half-duplex connections with presumably both sides seen separately:".to_string());
    lines.push(format!(
        "* {} ({:.1}%) connections",
        group_digits(analysis.correlation.matched),
        analysis.correlation.percentage
    ));
    lines.push("* Top ten history types for conns with both sides seen:".to_string());
    for entry in &analysis.correlation.history_types {
        lines.push(format!(
            "  * {} - {} ({:.1}%)",
            entry.label,
            group_digits(entry.count),
            entry.percentage
        ));
    }

    lines.join("\n")
}

/// Append one breakdown table, one row per label
///
/// **Private** - shared by the node and process sections
fn push_breakdown(lines: &mut Vec<String>, rows: &[BreakdownEntry]) {
    for entry in rows {
        lines.push(format!(
            "* {} - {} ({:.1}%)",
            entry.label,
            group_digits(entry.count),
            entry.percentage
        ));
    }
}

/// Format a count with thousands separators (1234567 -> "1,234,567")
///
/// **Private** - every rendered count goes through this
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Counts, CorrelationSummary, HistoryTypeEntry, IpPairEntry};

    fn sample_analysis() -> Analysis {
        Analysis {
            counts: Counts {
                total: 1_234_567,
                local_tcp: 2000,
                analyzed: 1000,
                half_duplex: 100,
                uppercase: 40,
                lowercase: 60,
                unparsed_lines: 0,
            },
            history_types: vec![HistoryTypeEntry {
                history: "SAD".to_string(),
                count: 80,
                upper: 30,
                lower: 50,
                percentage: 80.0,
            }],
            ip_pairs: vec![IpPairEntry {
                addr_a: "10.0.0.1".to_string(),
                addr_b: "10.0.0.2".to_string(),
                count: 25,
                percentage: 25.0,
            }],
            nodes: vec![BreakdownEntry {
                label: "eth2".to_string(),
                count: 90,
                percentage: 90.0,
            }],
            processes: vec![BreakdownEntry {
                label: "7".to_string(),
                count: 55,
                percentage: 55.0,
            }],
            correlation: CorrelationSummary {
                matched: 20,
                percentage: 20.0,
                pairs: 10,
                history_types: vec![BreakdownEntry {
                    label: "SAD".to_string(),
                    count: 10,
                    percentage: 100.0,
                }],
            },
        }
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1000), "1,000");
        assert_eq!(group_digits(1_234_567), "1,234,567");
    }

    #[test]
    fn test_render_summary_lines() {
        let text = render_text(&sample_analysis());

        assert!(text.starts_with("Summary:\n"));
        assert!(text.contains("* 1,234,567 total conns"));
        assert!(text.contains("* 2,000 total local orig/local resp TCP conns"));
        assert!(text.contains(
            "* 1,000 local TCP conns with history, 0.1% of the total (analyzed conns)"
        ));
        assert!(text.contains(
            "* 100 half-duplex conns, 10.0% of the analyzed conns and 0.0% of the total conns"
        ));
        assert!(text.contains("* 60 (60.0%) of these are lowercase, and 40 (40.0%) are uppercase"));
    }

    #[test]
    fn test_render_tables() {
        let text = render_text(&sample_analysis());

        assert!(text.contains("Top ten half-duplex history types:\n* SAD - 80 (80.0%)"));
        assert!(text.contains("Top IP address pairs:\n* 10.0.0.1 and 10.0.0.2 - 25 (25.0%)"));
        assert!(text.contains("Half-duplex connections by capture node:\n* eth2 - 90 (90.0%)"));
        assert!(text.contains("Half-duplex connections by sensor process:\n* 7 - 55 (55.0%)"));
    }

    #[test]
    fn test_render_correlation_section() {
        let text = render_text(&sample_analysis());

        assert!(text.contains(
            "Half-duplex connections with presumably both sides seen separately:\n* 20 (20.0%) connections"
        ));
        assert!(text.contains("* Top ten history types for conns with both sides seen:\n  * SAD - 10 (100.0%)"));
    }

    #[test]
    fn test_render_skipped_line_note_only_when_present() {
        let mut analysis = sample_analysis();
        assert!(!render_text(&analysis).contains("malformed lines skipped"));

        analysis.counts.unparsed_lines = 3;
        assert!(render_text(&analysis).contains("* 3 malformed lines skipped"));
    }

    #[test]
    fn test_render_all_zero_analysis() {
        let analysis = Analysis {
            counts: Counts {
                total: 0,
                local_tcp: 0,
                analyzed: 0,
                half_duplex: 0,
                uppercase: 0,
                lowercase: 0,
                unparsed_lines: 0,
            },
            history_types: vec![],
            ip_pairs: vec![],
            nodes: vec![],
            processes: vec![],
            correlation: CorrelationSummary {
                matched: 0,
                percentage: 0.0,
                pairs: 0,
                history_types: vec![],
            },
        };

        // Zero denominators render as 0.0%, never a panic
        let text = render_text(&analysis);
        assert!(text.contains("* 0 total conns"));
        assert!(text.contains("* 0 (0.0%) connections"));
    }
}
