//! Backend literals and the per-row insert representation.
//!
//! A [`RowRecord`] is the backend-neutral form of one insert: the target table plus
//! column/literal pairs. It is rendered to SQL or to a GraphQL object only at the backend
//! boundary.

use std::fmt::Write as _;

use crate::types::{BackendMode, CsvDataset, TypeTag, TypedValue};

/// A field value ready to be rendered for a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Missing value.
    Null,
    /// Numeric or boolean text, written unquoted.
    Bare(String),
    /// Text, date or timestamp, written quoted and escaped.
    Quoted(String),
}

impl Literal {
    /// Build a literal from a typed field.
    pub fn from_typed(value: &TypedValue) -> Self {
        match value.tag {
            TypeTag::Null => Literal::Null,
            TypeTag::Integer | TypeTag::Float | TypeTag::Boolean => Literal::Bare(value.raw.clone()),
            TypeTag::Date | TypeTag::Timestamp | TypeTag::String => {
                Literal::Quoted(value.raw.clone())
            }
        }
    }

    /// Render for a relational insert.
    pub fn to_sql(&self) -> String {
        match self {
            Literal::Null => "NULL".to_string(),
            Literal::Bare(v) => v.clone(),
            Literal::Quoted(v) => format!("'{}'", v.replace('\'', "''")),
        }
    }

    /// Render for a graph insert object. `None` means the field is left out.
    pub fn to_graph(&self) -> Option<String> {
        match self {
            Literal::Null => None,
            Literal::Bare(v) => Some(v.clone()),
            Literal::Quoted(v) => Some(format!(
                "\"{}\"",
                v.replace('\\', "\\\\").replace('"', "\\\"")
            )),
        }
    }
}

/// Encode a raw field of a known tag for `mode`.
///
/// Returns `None` only for a null field in [`BackendMode::Graph`], where the field is omitted
/// from the inserted object. Relational inserts always write `NULL` explicitly.
pub fn encode(raw: &str, tag: TypeTag, mode: BackendMode) -> Option<String> {
    let literal = Literal::from_typed(&TypedValue {
        raw: raw.to_owned(),
        tag,
    });
    match mode {
        BackendMode::Relational => Some(literal.to_sql()),
        BackendMode::Graph => literal.to_graph(),
    }
}

/// Quote a SQL identifier, doubling embedded double quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// One row destined for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    /// Target table.
    pub table: String,
    /// Columns in header order with their literals.
    pub fields: Vec<(String, Literal)>,
}

impl RowRecord {
    /// Build records for every row of a dataset.
    pub fn from_dataset(dataset: &CsvDataset) -> Vec<RowRecord> {
        dataset
            .typed_rows()
            .map(|row| RowRecord {
                table: dataset.table.clone(),
                fields: row
                    .into_iter()
                    .map(|(col, value)| (col.to_owned(), Literal::from_typed(&value)))
                    .collect(),
            })
            .collect()
    }

    /// `INSERT INTO "t" ("a", "b") VALUES (1, 'x');`
    ///
    /// Null fields are kept and written as `NULL`.
    pub fn to_sql_insert(&self) -> String {
        let columns = self
            .fields
            .iter()
            .map(|(c, _)| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let values = self
            .fields
            .iter()
            .map(|(_, l)| l.to_sql())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO {} ({columns}) VALUES ({values});",
            quote_ident(&self.table)
        )
    }

    /// `{a: 1, b: "x"}`, with null fields left out.
    pub fn to_graph_object(&self) -> String {
        let mut out = String::from("{");
        let mut first = true;
        for (column, literal) in &self.fields {
            let Some(value) = literal.to_graph() else {
                continue;
            };
            if !first {
                out.push_str(", ");
            }
            first = false;
            let _ = write!(out, "{column}: {value}");
        }
        out.push('}');
        out
    }
}

/// Render every record as one transaction-ready insert script, one statement per line.
pub fn sql_insert_script(records: &[RowRecord]) -> String {
    records
        .iter()
        .map(RowRecord::to_sql_insert)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render every record as a GraphQL list of objects: `[{...}, {...}]`.
pub fn graph_object_list(records: &[RowRecord]) -> String {
    let objects = records
        .iter()
        .map(RowRecord::to_graph_object)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{objects}]")
}
