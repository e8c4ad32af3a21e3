//! Eligibility filtering and duplex classification.
//!
//! The single defining rule of the tool lives here: a connection whose
//! history letters all share one case was only ever seen from one side.
//! Uppercase letters are events the originator sent, lowercase the
//! responder, so a uniform-case history means the capture point never
//! observed the other direction.

use crate::parser::{Conn, Proto};
use crate::utils::config::MIN_HISTORY_LEN;

/// Case profile of the letters in a history string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCase {
    /// Every letter uppercase: only the originator's events were seen
    Upper,
    /// Every letter lowercase: only the responder's events were seen
    Lower,
    /// Both cases present, or no letters at all
    Mixed,
}

/// An eligible record with its derived classification labels
///
/// Created once by [`classify`], consumed by the aggregator and
/// correlator, never mutated.
#[derive(Debug, Clone)]
pub struct ClassifiedConn {
    pub conn: Conn,
    /// Working history with leading direction-flip markers stripped
    pub history: String,
    /// Case-normalized history, the grouping key that folds an all-upper
    /// history together with its all-lower mirror
    pub history_type: String,
    pub case: HistoryCase,
    pub half_duplex: bool,
}

/// History with Zeek's leading `^` direction-flip markers removed
///
/// The `^` prefix records that the connection's roles were flipped by a
/// heuristic; it says nothing about which side was captured.
pub fn stripped_history(conn: &Conn) -> &str {
    conn.history.trim_start_matches('^')
}

/// Protocol/locality half of the eligibility test
///
/// Restricting to TCP between two local endpoints keeps the analysis to
/// traffic where both directions are expected to be visible, so a
/// one-sided history is a capture artifact rather than a topology one.
pub fn is_local_tcp(conn: &Conn) -> bool {
    conn.proto == Proto::Tcp && conn.local_orig == Some(true) && conn.local_resp == Some(true)
}

/// Full eligibility test; a pure function of proto, the two locality
/// flags, and the stripped history length
pub fn is_eligible(conn: &Conn) -> bool {
    is_local_tcp(conn) && stripped_history(conn).len() >= MIN_HISTORY_LEN
}

/// Case profile of a history string
///
/// Only letters are inspected; digits and punctuation are case-neutral.
/// A history without any letters has no usable case signal and comes back
/// `Mixed`.
pub fn history_case(history: &str) -> HistoryCase {
    let mut saw_letter = false;
    let mut all_upper = true;
    let mut all_lower = true;

    for ch in history.chars() {
        if ch.is_alphabetic() {
            saw_letter = true;
            all_upper &= ch.is_uppercase();
            all_lower &= ch.is_lowercase();
        }
    }

    if !saw_letter {
        return HistoryCase::Mixed;
    }
    if all_upper {
        HistoryCase::Upper
    } else if all_lower {
        HistoryCase::Lower
    } else {
        HistoryCase::Mixed
    }
}

/// True iff the history is uniformly one case (at least one letter)
pub fn is_half_duplex(history: &str) -> bool {
    matches!(history_case(history), HistoryCase::Upper | HistoryCase::Lower)
}

/// Run the filter and classifier over one record
///
/// **Public** - entry point for per-record classification
///
/// Returns `None` for ineligible records; the caller still counts those in
/// denominators, but they never reach the breakdowns.
pub fn classify(conn: Conn) -> Option<ClassifiedConn> {
    if !is_eligible(&conn) {
        return None;
    }

    let history = stripped_history(&conn).to_string();
    let case = history_case(&history);
    let half_duplex = matches!(case, HistoryCase::Upper | HistoryCase::Lower);
    let history_type = history.to_uppercase();

    Some(ClassifiedConn {
        conn,
        history,
        history_type,
        case,
        half_duplex,
    })
}
