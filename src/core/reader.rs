//! Structured document reader.
//!
//! Parses `.toml` documents into a generic table. Failures never escape as errors:
//! they come back as `ParseFailure` values and the file contributes nothing further.

use crate::core::scan::FileRef;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// A successfully parsed structured document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// `/`-separated path relative to the root
    pub path: String,
    /// File name including extension
    pub name: String,
    pub raw: String,
    pub table: toml::Table,
}

impl ParsedDocument {
    /// File name without its extension.
    pub fn stem(&self) -> &str {
        file_stem(&self.name)
    }
}

pub fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum ParseCause {
    #[error("read failed: {0}")]
    Io(String),
    #[error("syntax error: {0}")]
    Syntax(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{path}: {cause}")]
pub struct ParseFailure {
    pub path: String,
    pub cause: ParseCause,
    /// Original text when the file was readable but malformed
    #[serde(skip)]
    pub raw: Option<String>,
}

pub type ReadOutcome = Result<ParsedDocument, ParseFailure>;

/// Read and parse one structured document.
pub fn read_structured(root: &Path, file: &FileRef) -> ReadOutcome {
    let abs = root.join(&file.path);
    let raw = fs::read_to_string(&abs).map_err(|e| ParseFailure {
        path: file.path.clone(),
        cause: ParseCause::Io(e.to_string()),
        raw: None,
    })?;
    parse_structured(&file.path, &file.name, raw)
}

/// Parse already-loaded text.
pub fn parse_structured(path: &str, name: &str, raw: String) -> ReadOutcome {
    match raw.parse::<toml::Table>() {
        Ok(table) => {
            debug!(path, "parsed structured document");
            Ok(ParsedDocument {
                path: path.to_string(),
                name: name.to_string(),
                raw,
                table,
            })
        }
        Err(e) => Err(ParseFailure {
            path: path.to_string(),
            cause: ParseCause::Syntax(e.message().to_string()),
            raw: Some(raw),
        }),
    }
}

/// Read sibling files concurrently; results keep the input order.
pub fn read_all(root: &Path, files: &[&FileRef]) -> Vec<ReadOutcome> {
    let outcomes: Vec<ReadOutcome> = files
        .par_iter()
        .map(|file| read_structured(root, file))
        .collect();
    for failure in outcomes.iter().filter_map(|o| o.as_ref().err()) {
        warn!(path = %failure.path, cause = %failure.cause, "structured document skipped");
    }
    outcomes
}

/// Convert a TOML value to JSON. Datetimes become their string form and
/// non-finite floats become `null`.
pub fn to_json(value: &toml::Value) -> JsonValue {
    match value {
        toml::Value::String(s) => JsonValue::String(s.clone()),
        toml::Value::Integer(i) => JsonValue::from(*i),
        toml::Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        toml::Value::Boolean(b) => JsonValue::Bool(*b),
        toml::Value::Datetime(dt) => JsonValue::String(dt.to_string()),
        toml::Value::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        toml::Value::Table(table) => JsonValue::Object(table_to_json(table)),
    }
}

pub fn table_to_json(table: &toml::Table) -> serde_json::Map<String, JsonValue> {
    table.iter().map(|(k, v)| (k.clone(), to_json(v))).collect()
}
