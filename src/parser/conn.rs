//! conn.log record parsing.
//!
//! Turns one tab-delimited data line into a typed [`Conn`] using the
//! resolved schema. Unset sentinels map to `None`, never to `false` or zero:
//! an absent `local_orig` means "unknown", and treating it as `false` would
//! silently misclassify records.

use super::header::LogSchema;
use crate::utils::config::{
    FIELD_CONN_STATE, FIELD_DURATION, FIELD_HISTORY, FIELD_LOCAL_ORIG, FIELD_LOCAL_RESP,
    FIELD_ORIG_BYTES, FIELD_ORIG_H, FIELD_ORIG_P, FIELD_PEER, FIELD_PROTO, FIELD_RESP_BYTES,
    FIELD_RESP_H, FIELD_RESP_P, FIELD_SERVICE, FIELD_TS, FIELD_TUNNEL_PARENTS, FIELD_UID,
};
use crate::utils::error::ParseError;
use std::convert::Infallible;
use std::str::FromStr;

/// Transport protocol of a logged connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proto {
    Tcp,
    Udp,
    Icmp,
    Other,
}

impl Proto {
    /// Map a proto token to its variant; unknown values become `Other`
    pub fn from_token(s: &str) -> Self {
        match s {
            "tcp" => Self::Tcp,
            "udp" => Self::Udp,
            "icmp" => Self::Icmp,
            _ => Self::Other,
        }
    }
}

impl FromStr for Proto {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

/// One parsed conn.log record
///
/// Immutable once parsed. Addresses stay in string form (v4 or v6);
/// grouping and tie-break ordering downstream are string-lexicographic.
#[derive(Debug, Clone)]
pub struct Conn {
    pub ts: Option<f64>,
    pub uid: Option<String>,
    pub orig_h: String,
    pub orig_p: Option<u16>,
    pub resp_h: String,
    pub resp_p: Option<u16>,
    pub proto: Proto,
    pub local_orig: Option<bool>,
    pub local_resp: Option<bool>,
    /// Direction/flag characters; uppercase = originator, lowercase =
    /// responder. Empty when the log left it unset.
    pub history: String,
    /// Capture NIC, derived from the cluster `peer` field
    pub node: Option<String>,
    /// Worker process number, derived from the cluster `peer` field
    pub sensor_process: Option<String>,
    // Passthrough fields, carried but not consulted by the analyzer.
    pub service: Option<String>,
    pub duration: Option<f64>,
    pub orig_bytes: Option<u64>,
    pub resp_bytes: Option<u64>,
    pub conn_state: Option<String>,
    pub tunnel_parents: Option<Vec<String>>,
}

/// Data lines are everything except `#` directives/comments and blank lines
pub fn is_data_line(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with('#')
}

/// Parse one data line into a [`Conn`]
///
/// **Public** - main entry point for record parsing
///
/// # Errors
/// * `ParseError::ColumnCount` - the line does not match the schema width
/// * `ParseError::InvalidValue` - a malformed numeric/boolean token
pub fn parse_record(line: &str, schema: &LogSchema) -> Result<Conn, ParseError> {
    let row = Row::split(line, schema)?;

    let (node, sensor_process) = split_peer(row.raw(FIELD_PEER));

    Ok(Conn {
        ts: row.float(FIELD_TS, "time")?,
        uid: row.string(FIELD_UID),
        orig_h: row.text(FIELD_ORIG_H),
        orig_p: row.port(FIELD_ORIG_P)?,
        resp_h: row.text(FIELD_RESP_H),
        resp_p: row.port(FIELD_RESP_P)?,
        proto: row.raw(FIELD_PROTO).map(Proto::from_token).unwrap_or(Proto::Other),
        local_orig: row.boolean(FIELD_LOCAL_ORIG)?,
        local_resp: row.boolean(FIELD_LOCAL_RESP)?,
        history: row.text(FIELD_HISTORY),
        node,
        sensor_process,
        service: row.string(FIELD_SERVICE),
        duration: row.float(FIELD_DURATION, "interval")?,
        orig_bytes: row.count(FIELD_ORIG_BYTES)?,
        resp_bytes: row.count(FIELD_RESP_BYTES)?,
        conn_state: row.string(FIELD_CONN_STATE),
        tunnel_parents: row.string_set(FIELD_TUNNEL_PARENTS),
    })
}

/// Derive (node, process) from a cluster peer name
///
/// Peer names look like `worker-eth3-12`: the middle part is the capture
/// NIC and the trailing part the worker process number. Anything shorter
/// carries neither.
fn split_peer(peer: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(peer) = peer else {
        return (None, None);
    };

    let parts: Vec<&str> = peer.split('-').collect();
    if parts.len() < 3 {
        return (None, None);
    }

    (Some(parts[1].to_string()), Some(parts[2].to_string()))
}

/// Borrowed view over one split data line, resolved through the schema
///
/// **Private** - field access helpers for parse_record
struct Row<'a> {
    cols: Vec<&'a str>,
    schema: &'a LogSchema,
}

impl<'a> Row<'a> {
    fn split(line: &'a str, schema: &'a LogSchema) -> Result<Self, ParseError> {
        let cols: Vec<&str> = line.split(schema.separator).collect();
        if cols.len() != schema.field_count() {
            return Err(ParseError::ColumnCount {
                expected: schema.field_count(),
                found: cols.len(),
            });
        }
        Ok(Self { cols, schema })
    }

    /// Raw token for a named field. `None` when this log has no such column
    /// or the column holds the unset sentinel.
    fn raw(&self, name: &str) -> Option<&'a str> {
        let idx = self.schema.index_of(name)?;
        let token = self.cols[idx];
        if token == self.schema.unset_field {
            None
        } else {
            Some(token)
        }
    }

    /// String field; the empty-field sentinel becomes an empty string
    fn string(&self, name: &str) -> Option<String> {
        let token = self.raw(name)?;
        if token == self.schema.empty_field {
            Some(String::new())
        } else {
            Some(token.to_string())
        }
    }

    /// String field flattened to "" when absent or unset; used for fields
    /// the analyzer treats as plain text (addresses, history)
    fn text(&self, name: &str) -> String {
        self.string(name).unwrap_or_default()
    }

    /// Boolean field: exactly `T` or `F`, anything else is malformed
    fn boolean(&self, name: &str) -> Result<Option<bool>, ParseError> {
        match self.raw(name) {
            None => Ok(None),
            Some("T") => Ok(Some(true)),
            Some("F") => Ok(Some(false)),
            Some(other) => Err(ParseError::InvalidValue {
                field: name.to_string(),
                kind: "bool",
                value: other.to_string(),
            }),
        }
    }

    fn port(&self, name: &str) -> Result<Option<u16>, ParseError> {
        self.number::<u16>(name, "port")
    }

    fn count(&self, name: &str) -> Result<Option<u64>, ParseError> {
        self.number::<u64>(name, "count")
    }

    fn float(&self, name: &str, kind: &'static str) -> Result<Option<f64>, ParseError> {
        self.number::<f64>(name, kind)
    }

    /// Set-valued field, split on the schema's set separator; the
    /// empty-field sentinel is an empty set
    fn string_set(&self, name: &str) -> Option<Vec<String>> {
        let token = self.raw(name)?;
        if token == self.schema.empty_field {
            return Some(Vec::new());
        }
        Some(
            token
                .split(self.schema.set_separator.as_str())
                .map(str::to_string)
                .collect(),
        )
    }

    fn number<T: FromStr>(&self, name: &str, kind: &'static str) -> Result<Option<T>, ParseError> {
        match self.raw(name) {
            None => Ok(None),
            Some(token) if token == self.schema.empty_field => Ok(None),
            Some(token) => token.parse::<T>().map(Some).map_err(|_| {
                ParseError::InvalidValue {
                    field: name.to_string(),
                    kind,
                    value: token.to_string(),
                }
            }),
        }
    }
}
