//! Zeek ASCII header parsing and schema resolution.
//!
//! Field order and presence vary by deployment, so the layout of a log is
//! discovered from its `#`-prefixed header once per input: `#separator`
//! declares the column delimiter, `#unset_field`/`#empty_field` the value
//! sentinels, and `#fields`/`#types` the column names and declared types.

use crate::utils::config::{
    ANALYZER_FIELDS, DEFAULT_EMPTY_FIELD, DEFAULT_SEPARATOR, DEFAULT_SET_SEPARATOR,
    DEFAULT_UNSET_FIELD,
};
use crate::utils::error::SchemaError;
use log::{debug, warn};
use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

/// Declared type of a log field, from the `#types` header line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Time,
    Str,
    Bool,
    Addr,
    Port,
    Enum,
    Interval,
    Count,
    Int,
    Set,
    Other,
}

impl FromStr for FieldType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "time" => Self::Time,
            "string" => Self::Str,
            "bool" => Self::Bool,
            "addr" => Self::Addr,
            "port" => Self::Port,
            "enum" => Self::Enum,
            "interval" => Self::Interval,
            "count" => Self::Count,
            "int" => Self::Int,
            s if s.starts_with("set[") || s.starts_with("vector[") => Self::Set,
            _ => Self::Other,
        })
    }
}

/// One declared field: name and type, in column order
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
}

/// Resolved layout of one log: delimiter, sentinels, and field order
///
/// Built once per input from the header, then used to interpret every
/// data line. Never mutated after resolution.
#[derive(Debug, Clone)]
pub struct LogSchema {
    pub separator: char,
    pub set_separator: String,
    pub empty_field: String,
    pub unset_field: String,
    pub path: Option<String>,
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl LogSchema {
    /// Resolve a schema from the collected header lines
    ///
    /// # Errors
    /// * `SchemaError::MissingHeader` - no header lines at all
    /// * `SchemaError::MissingFields` / `MissingTypes` - a required directive
    ///   is absent
    /// * `SchemaError::FieldTypeMismatch` - `#fields` and `#types` disagree
    ///   on column count
    /// * `SchemaError::BadSeparator` - unparsable `#separator` value
    pub fn from_header<S: AsRef<str>>(lines: &[S]) -> Result<Self, SchemaError> {
        if lines.is_empty() {
            return Err(SchemaError::MissingHeader);
        }

        let mut separator = DEFAULT_SEPARATOR;
        let mut set_separator = DEFAULT_SET_SEPARATOR.to_string();
        let mut empty_field = DEFAULT_EMPTY_FIELD.to_string();
        let mut unset_field = DEFAULT_UNSET_FIELD.to_string();
        let mut path = None;
        let mut names: Option<Vec<String>> = None;
        let mut types: Option<Vec<FieldType>> = None;

        for line in lines {
            let line = line.as_ref();

            // The #separator line is space-delimited because the separator
            // itself is what it declares. Zeek writes it first; everything
            // after it is split on the declared separator.
            if let Some(value) = line.strip_prefix("#separator ") {
                separator = unescape_separator(value.trim())?;
                continue;
            }

            let mut parts = line.split(separator);
            let directive = parts.next().unwrap_or("");
            match directive {
                "#set_separator" => {
                    if let Some(v) = parts.next() {
                        set_separator = v.to_string();
                    }
                }
                "#empty_field" => {
                    if let Some(v) = parts.next() {
                        empty_field = v.to_string();
                    }
                }
                "#unset_field" => {
                    if let Some(v) = parts.next() {
                        unset_field = v.to_string();
                    }
                }
                "#path" => {
                    path = parts.next().map(str::to_string);
                }
                "#fields" => {
                    names = Some(parts.map(str::to_string).collect());
                }
                "#types" => {
                    // FromStr is infallible: unknown type names become Other
                    types = Some(parts.map(|t| t.parse().unwrap_or(FieldType::Other)).collect());
                }
                // #open, #close and anything else carry no layout information
                _ => {}
            }
        }

        let names = names.ok_or(SchemaError::MissingFields)?;
        let types = types.ok_or(SchemaError::MissingTypes)?;
        if names.len() != types.len() {
            return Err(SchemaError::FieldTypeMismatch {
                fields: names.len(),
                types: types.len(),
            });
        }

        let fields: Vec<Field> = names
            .into_iter()
            .zip(types)
            .map(|(name, ty)| Field { name, ty })
            .collect();

        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect::<HashMap<_, _>>();

        for required in ANALYZER_FIELDS {
            if !index.contains_key(*required) {
                warn!(
                    "header is missing field '{}'; dependent checks will treat it as unknown",
                    required
                );
            }
        }

        debug!(
            "resolved schema: {} fields, path {:?}",
            fields.len(),
            path.as_deref()
        );

        Ok(Self {
            separator,
            set_separator,
            empty_field,
            unset_field,
            path,
            fields,
            index,
        })
    }

    /// Number of columns a data line must have
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Column position of a named field, if this log carries it
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Declared type of a named field, if this log carries it
    pub fn type_of(&self, name: &str) -> Option<FieldType> {
        self.index_of(name).map(|i| self.fields[i].ty)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Decode a `#separator` value: either a literal character or a `\xHH` escape
///
/// **Private** - internal helper for schema resolution
fn unescape_separator(value: &str) -> Result<char, SchemaError> {
    if let Some(hex) = value.strip_prefix("\\x") {
        let byte = u8::from_str_radix(hex, 16)
            .map_err(|_| SchemaError::BadSeparator(value.to_string()))?;
        return Ok(byte as char);
    }

    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(SchemaError::BadSeparator(value.to_string())),
    }
}
