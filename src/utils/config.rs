//! Configuration and constants for the CLI.

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Number of entries kept in the top-N report tables
pub const TOP_N: usize = 10;

/// Shortest history a record may have and still be analyzed; single-flag
/// histories carry no duplex information
pub const MIN_HISTORY_LEN: usize = 2;

// Defaults for Zeek ASCII logs when the header omits a directive.
// Every Zeek-written log declares these explicitly; the defaults only
// matter for hand-trimmed files.
pub const DEFAULT_SEPARATOR: char = '\t';
pub const DEFAULT_SET_SEPARATOR: &str = ",";
pub const DEFAULT_EMPTY_FIELD: &str = "(empty)";
pub const DEFAULT_UNSET_FIELD: &str = "-";

// conn.log field names the analyzer depends on. Field order varies by
// deployment and is discovered from the #fields header line, so these are
// looked up by name rather than position.
pub const FIELD_TS: &str = "ts";
pub const FIELD_UID: &str = "uid";
pub const FIELD_ORIG_H: &str = "id.orig_h";
pub const FIELD_ORIG_P: &str = "id.orig_p";
pub const FIELD_RESP_H: &str = "id.resp_h";
pub const FIELD_RESP_P: &str = "id.resp_p";
pub const FIELD_PROTO: &str = "proto";
pub const FIELD_SERVICE: &str = "service";
pub const FIELD_DURATION: &str = "duration";
pub const FIELD_ORIG_BYTES: &str = "orig_bytes";
pub const FIELD_RESP_BYTES: &str = "resp_bytes";
pub const FIELD_CONN_STATE: &str = "conn_state";
pub const FIELD_LOCAL_ORIG: &str = "local_orig";
pub const FIELD_LOCAL_RESP: &str = "local_resp";
pub const FIELD_HISTORY: &str = "history";
pub const FIELD_TUNNEL_PARENTS: &str = "tunnel_parents";
pub const FIELD_PEER: &str = "peer";

/// Fields the filter and classifier read. A log missing one of these still
/// parses; the dependent stage treats the value as unknown.
pub const ANALYZER_FIELDS: &[&str] = &[
    FIELD_HISTORY,
    FIELD_PROTO,
    FIELD_LOCAL_ORIG,
    FIELD_LOCAL_RESP,
];
