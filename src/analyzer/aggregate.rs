//! Single-pass accumulation of counters and grouping tables.
//!
//! The aggregator sees every parsed record exactly once, in line order.
//! Eligible records are classified on the way in; half-duplex ones feed the
//! grouping tables and are retained for the reverse-flow correlation that
//! runs when the tables are extracted.

use std::collections::HashMap;

use log::debug;

use super::classify::{self, ClassifiedConn, HistoryCase};
use super::correlate::correlate;
use crate::parser::Conn;
use crate::report::{Analysis, BreakdownEntry, Counts, HistoryTypeEntry, IpPairEntry};
use crate::utils::config::TOP_N;

/// Percentage of `count` over `denominator`, `0.0` when the denominator is zero
pub fn percentage(count: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (count as f64 / denominator as f64) * 100.0
    }
}

/// Per-history-type accumulator cell
#[derive(Debug, Default)]
struct HistoryCell {
    count: u64,
    upper: u64,
    lower: u64,
}

/// Accumulates one run's counters, grouping tables and retained records
///
/// **Public** - fed by the pipeline driver, drained by [`Aggregator::into_analysis`]
#[derive(Debug, Default)]
pub struct Aggregator {
    total: u64,
    local_tcp: u64,
    analyzed: u64,
    half_duplex: u64,
    uppercase: u64,
    lowercase: u64,
    unparsed_lines: u64,
    history_types: HashMap<String, HistoryCell>,
    ip_pairs: HashMap<(String, String), u64>,
    nodes: HashMap<String, u64>,
    processes: HashMap<String, u64>,
    retained: Vec<ClassifiedConn>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one parsed record through the filter and classifier
    ///
    /// **Public** - called once per data line that parsed
    pub fn observe(&mut self, conn: Conn) {
        self.total += 1;
        if classify::is_local_tcp(&conn) {
            self.local_tcp += 1;
        }
        if let Some(classified) = classify::classify(conn) {
            self.record_analyzed(classified);
        }
    }

    /// Record one classified connection
    ///
    /// Counts every record as analyzed; only half-duplex records reach the
    /// grouping tables and the retained set.
    pub fn record_analyzed(&mut self, classified: ClassifiedConn) {
        self.analyzed += 1;
        if !classified.half_duplex {
            return;
        }

        self.half_duplex += 1;

        let cell = self
            .history_types
            .entry(classified.history_type.clone())
            .or_default();
        cell.count += 1;
        match classified.case {
            HistoryCase::Upper => {
                self.uppercase += 1;
                cell.upper += 1;
            }
            HistoryCase::Lower => {
                self.lowercase += 1;
                cell.lower += 1;
            }
            HistoryCase::Mixed => {}
        }

        let pair = unordered_pair(&classified.conn.orig_h, &classified.conn.resp_h);
        *self.ip_pairs.entry(pair).or_insert(0) += 1;

        if let Some(node) = &classified.conn.node {
            *self.nodes.entry(node.clone()).or_insert(0) += 1;
        }
        if let Some(process) = &classified.conn.sensor_process {
            *self.processes.entry(process.clone()).or_insert(0) += 1;
        }

        self.retained.push(classified);
    }

    /// Count a data line that failed to parse
    pub fn record_unparsed(&mut self) {
        self.unparsed_lines += 1;
    }

    /// Extract the final tables; consumes the accumulator
    ///
    /// **Public** - terminal step of the pipeline
    ///
    /// Runs the correlator over the retained half-duplex records, converts
    /// each grouping map into a sorted table and attaches percentages. An
    /// aggregator that saw no records yields an all-zero analysis.
    pub fn into_analysis(self) -> Analysis {
        debug!(
            "Extracting tables from {} retained half-duplex records",
            self.retained.len()
        );

        let half_duplex = self.half_duplex;
        let correlation = correlate(&self.retained, half_duplex);

        let mut history_types: Vec<HistoryTypeEntry> = self
            .history_types
            .into_iter()
            .map(|(history, cell)| HistoryTypeEntry {
                history,
                count: cell.count,
                upper: cell.upper,
                lower: cell.lower,
                percentage: percentage(cell.count, half_duplex),
            })
            .collect();
        history_types
            .sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.history.cmp(&b.history)));
        history_types.truncate(TOP_N);

        let mut ip_pairs: Vec<IpPairEntry> = self
            .ip_pairs
            .into_iter()
            .map(|((addr_a, addr_b), count)| IpPairEntry {
                addr_a,
                addr_b,
                count,
                percentage: percentage(count, half_duplex),
            })
            .collect();
        ip_pairs.sort_by(|a, b| {
            b.count.cmp(&a.count).then_with(|| {
                (a.addr_a.as_str(), a.addr_b.as_str()).cmp(&(b.addr_a.as_str(), b.addr_b.as_str()))
            })
        });
        ip_pairs.truncate(TOP_N);

        Analysis {
            counts: Counts {
                total: self.total,
                local_tcp: self.local_tcp,
                analyzed: self.analyzed,
                half_duplex,
                uppercase: self.uppercase,
                lowercase: self.lowercase,
                unparsed_lines: self.unparsed_lines,
            },
            history_types,
            ip_pairs,
            nodes: breakdown(self.nodes, half_duplex),
            processes: breakdown(self.processes, half_duplex),
            correlation,
        }
    }
}

/// Convert a label-to-count map into a sorted table, no truncation
///
/// **Private** - shared by the node and process tables
fn breakdown(map: HashMap<String, u64>, denominator: u64) -> Vec<BreakdownEntry> {
    let mut rows: Vec<BreakdownEntry> = map
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            label,
            count,
            percentage: percentage(count, denominator),
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Unordered IP address pair, smaller address first
///
/// **Private** - grouping key that folds a flow and its reverse together
fn unordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}
