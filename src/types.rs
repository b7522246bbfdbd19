//! Core data model types.
//!
//! Source files are read into a [`CsvDataset`] of raw text fields. Typing happens later, per
//! field, through [`crate::encoding::classify`], which yields a [`TypedValue`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Semantic type inferred from a raw text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Empty field.
    Null,
    /// Digits only.
    Integer,
    /// `digits.digits`.
    Float,
    /// Exactly `true` or `false`.
    Boolean,
    /// `YYYY-MM-DD`.
    Date,
    /// `YYYY-MM-DD HH:MM:SS`.
    Timestamp,
    /// Anything else.
    String,
}

/// A raw field together with its inferred [`TypeTag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    /// Raw text as it appeared in the source file.
    pub raw: String,
    /// Inferred type.
    pub tag: TypeTag,
}

impl TypedValue {
    /// Classify `raw` and wrap it.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let tag = crate::encoding::classify(&raw);
        Self { raw, tag }
    }
}

/// Which kind of backend a run targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    /// Directly addressed SQL store.
    Relational,
    /// HTTP query/mutation service.
    Graph,
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendMode::Relational => f.write_str("relational"),
            BackendMode::Graph => f.write_str("graph"),
        }
    }
}

/// One source file loaded into memory.
///
/// Rows keep their raw text; every row is padded to the header length at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDataset {
    /// File the dataset was read from.
    pub path: PathBuf,
    /// Table name derived from the file name.
    pub table: String,
    /// Ordered column names from the header line.
    pub columns: Vec<String>,
    /// Ordered rows of raw fields, each `columns.len()` long.
    pub rows: Vec<Vec<String>>,
    /// Rows that carried more fields than the header (extra fields were dropped).
    pub overlong_rows: usize,
}

impl CsvDataset {
    /// Number of data rows (header excluded).
    pub fn record_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the file had a header but no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows as `(column, TypedValue)` pairs in header order.
    pub fn typed_rows(&self) -> impl Iterator<Item = Vec<(&str, TypedValue)>> + '_ {
        self.rows.iter().map(|row| {
            self.columns
                .iter()
                .zip(row.iter())
                .map(|(col, raw)| (col.as_str(), TypedValue::new(raw.as_str())))
                .collect()
        })
    }
}

/// A table name plus its optional rank in the purge priority list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDescriptor {
    /// Table name.
    pub name: String,
    /// Position in the priority list, if listed. Lower purges first.
    pub priority: Option<usize>,
}
