//! Classification and aggregation of parsed conn.log records.
//!
//! This module turns a stream of records into the final analysis:
//! - Eligibility filtering and half-duplex classification
//! - Counters and grouping tables (history type, IP pair, node, process)
//! - Reverse-flow correlation over the retained half-duplex records

pub mod aggregate;
pub mod classify;
pub mod correlate;
pub mod pipeline;

// Re-export main types and functions
pub use aggregate::{percentage, Aggregator};
pub use classify::{
    classify, history_case, is_eligible, is_half_duplex, is_local_tcp, stripped_history,
    ClassifiedConn, HistoryCase,
};
pub use correlate::{correlate, FlowKey};
pub use pipeline::analyze_log;
