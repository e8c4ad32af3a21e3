//! Reverse-flow correlation over retained half-duplex records.
//!
//! A half-duplex record whose exact reverse flow also shows up half-duplex
//! usually means both directions were captured, just by different capture
//! points that never merged them. Pairing those records separates "the
//! other side exists elsewhere in this log" from "the other side was never
//! seen at all".

use std::collections::{HashMap, VecDeque};

use log::debug;

use super::aggregate::percentage;
use super::classify::ClassifiedConn;
use crate::report::{BreakdownEntry, CorrelationSummary};
use crate::utils::config::TOP_N;

/// The 4-tuple identifying one direction of a flow
///
/// Ordering is lexicographic over `(orig_h, orig_p, resp_h, resp_p)`; the
/// smaller side of a matched pair becomes the pair's seed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey {
    pub orig_h: String,
    pub orig_p: u16,
    pub resp_h: String,
    pub resp_p: u16,
}

impl FlowKey {
    /// Flow key of a retained record, `None` when either port is missing
    pub fn of(record: &ClassifiedConn) -> Option<Self> {
        let orig_p = record.conn.orig_p?;
        let resp_p = record.conn.resp_p?;
        Some(Self {
            orig_h: record.conn.orig_h.clone(),
            orig_p,
            resp_h: record.conn.resp_h.clone(),
            resp_p,
        })
    }

    /// The same flow seen from the other side
    pub fn reversed(&self) -> Self {
        Self {
            orig_h: self.resp_h.clone(),
            orig_p: self.resp_p,
            resp_h: self.orig_h.clone(),
            resp_p: self.orig_p,
        }
    }
}

/// Match retained half-duplex records against their reverse flows
///
/// **Public** - runs once, after the main pass
///
/// # Arguments
/// * `retained` - Half-duplex records in line order
/// * `half_duplex` - Total half-duplex count, the percentage denominator
///
/// # Returns
/// Matched/pair counts and the top history types among pair seeds
///
/// Records are visited in line order and each consumes the first
/// still-unmatched record carrying the exact reverse key. Every record
/// matches at most once, and never itself, even when its key is its own
/// reverse. Records missing either port never match.
pub fn correlate(retained: &[ClassifiedConn], half_duplex: u64) -> CorrelationSummary {
    let keys: Vec<Option<FlowKey>> = retained.iter().map(FlowKey::of).collect();

    // Key -> indices carrying it, in line order
    let mut queues: HashMap<&FlowKey, VecDeque<usize>> = HashMap::new();
    for (i, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            queues.entry(key).or_default().push_back(i);
        }
    }

    let mut matched = vec![false; retained.len()];
    let mut seeds: Vec<usize> = Vec::new();

    for i in 0..retained.len() {
        if matched[i] {
            continue;
        }
        let Some(key) = keys[i].as_ref() else {
            continue;
        };

        let reverse = key.reversed();
        let Some(queue) = queues.get_mut(&reverse) else {
            continue;
        };

        // Consume the first live reverse instance. Entries for records
        // matched in earlier iterations are discarded lazily here. When the
        // key is its own reverse, the record's own slot sits in this queue;
        // it is held aside and restored so later records still see it.
        let mut held_own = false;
        let mut partner = None;
        while let Some(j) = queue.pop_front() {
            if j == i {
                held_own = true;
                continue;
            }
            if matched[j] {
                continue;
            }
            partner = Some(j);
            break;
        }
        if held_own {
            queue.push_front(i);
        }

        if let Some(j) = partner {
            matched[i] = true;
            matched[j] = true;
            seeds.push(if *key <= reverse { i } else { j });
        }
    }

    debug!(
        "Matched {} reverse-flow pairs among {} retained records",
        seeds.len(),
        retained.len()
    );

    let pairs = seeds.len() as u64;
    let matched_count = pairs * 2;

    let mut seed_types: HashMap<&str, u64> = HashMap::new();
    for &seed in &seeds {
        *seed_types
            .entry(retained[seed].history_type.as_str())
            .or_insert(0) += 1;
    }
    let mut history_types: Vec<BreakdownEntry> = seed_types
        .into_iter()
        .map(|(label, count)| BreakdownEntry {
            label: label.to_string(),
            count,
            percentage: percentage(count, pairs),
        })
        .collect();
    history_types.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    history_types.truncate(TOP_N);

    CorrelationSummary {
        matched: matched_count,
        percentage: percentage(matched_count, half_duplex),
        pairs,
        history_types,
    }
}
