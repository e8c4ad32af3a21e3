//! Conn Doctor
//!
//! Half-duplex capture diagnosis for Zeek conn.log files.
//!
//! A network monitor that only ever sees one direction of a TCP
//! connection logs a `history` whose letters are all one case. This crate
//! parses a conn.log, classifies those one-sided connections, and reports
//! where they concentrate: by history type, IP address pair, capture node
//! and sensor process, plus the flows whose other side shows up elsewhere
//! in the same log.
//!
//! This crate provides the core implementation for the `conn-doctor`
//! CLI tool.

pub mod analyzer;
pub mod commands;
pub mod output;
pub mod parser;
pub mod report;
pub mod utils;
