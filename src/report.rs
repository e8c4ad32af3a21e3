//! Report structures for analysis results.
//!
//! This module defines the aggregate produced by one run and the versioned
//! document we write to JSON. Schema is versioned to allow future evolution.
//! `Analysis` is plain data, fully determined by the input lines, and derives
//! `PartialEq` so two runs over the same log can be compared directly.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::utils::config::REPORT_VERSION;

/// Top-level report document written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated (RFC 3339)
    pub generated_at: String,

    /// Input log path as given on the command line
    pub source: String,

    /// The analysis itself
    pub analysis: Analysis,
}

/// Complete outcome of one analysis run
///
/// Field order follows the rendered report: headline counters, then the
/// ranked tables, then the reverse-flow correlation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Headline counters
    pub counts: Counts,

    /// Top half-duplex history types (case-normalized), largest first
    pub history_types: Vec<HistoryTypeEntry>,

    /// Top IP address pairs among half-duplex connections
    pub ip_pairs: Vec<IpPairEntry>,

    /// Half-duplex connections per capture node, complete table
    pub nodes: Vec<BreakdownEntry>,

    /// Half-duplex connections per sensor process, complete table
    pub processes: Vec<BreakdownEntry>,

    /// Reverse-flow correlation outcome
    pub correlation: CorrelationSummary,
}

/// Headline counters for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counts {
    /// Every record in the log, parsable or not
    pub total: u64,

    /// TCP records with both endpoints marked local
    pub local_tcp: u64,

    /// Records that passed the full eligibility filter
    pub analyzed: u64,

    /// Analyzed records classified half-duplex
    pub half_duplex: u64,

    /// Half-duplex records with an all-uppercase history (originator side)
    pub uppercase: u64,

    /// Half-duplex records with an all-lowercase history (responder side)
    pub lowercase: u64,

    /// Data lines skipped because they did not parse
    pub unparsed_lines: u64,
}

/// One row of the half-duplex history type table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTypeEntry {
    /// Case-normalized (uppercase) history string
    pub history: String,

    /// Half-duplex connections with this history type
    pub count: u64,

    /// How many of them were uppercase in the log
    pub upper: u64,

    /// How many of them were lowercase in the log
    pub lower: u64,

    /// Percentage of all half-duplex connections
    pub percentage: f64,
}

/// One row of the IP address pair table
///
/// The pair is unordered: `addr_a` is the lexicographically smaller
/// address, so a flow and its reverse land on the same row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpPairEntry {
    pub addr_a: String,
    pub addr_b: String,

    /// Half-duplex connections between the two addresses
    pub count: u64,

    /// Percentage of all half-duplex connections
    pub percentage: f64,
}

/// One row of a labeled breakdown table (node, process, correlated history)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// Outcome of the reverse-flow correlation pass
///
/// A matched connection is a half-duplex record whose exact reverse flow
/// also appears in the half-duplex set: both sides were captured, just not
/// in the same record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSummary {
    /// Half-duplex connections that found their reverse (both sides counted)
    pub matched: u64,

    /// Percentage of all half-duplex connections
    pub percentage: f64,

    /// Number of matched pairs (= matched / 2)
    pub pairs: u64,

    /// Top history types among pair seeds, percentages over pair count
    pub history_types: Vec<BreakdownEntry>,
}

/// Wrap an analysis in the versioned report envelope
///
/// **Public** - called by the analyze command before writing JSON
pub fn to_report(analysis: Analysis, source: &str) -> Report {
    Report {
        version: REPORT_VERSION.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        source: source.to_string(),
        analysis,
    }
}
