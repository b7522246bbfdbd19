//! Post-load reconciliation of source record counts against backend counts.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::backend::BackendAdapter;
use crate::ingestion::{record_count, table_name_from_path};
use crate::summary::OperationStatus;

/// Per-table comparison outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchStatus {
    /// Both counts known and equal.
    Match,
    /// Both counts known and different.
    Diff,
    /// One side could not be counted; excluded from the percentage.
    Unknown,
}

/// One row of the reconciliation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableReconciliation {
    /// Table name derived from the source file.
    pub table: String,
    pub source_file: PathBuf,
    /// Data rows in the file; `None` when it could not be read.
    pub source_count: Option<u64>,
    /// Records in the backend; `None` when the count failed.
    pub backend_count: Option<u64>,
    pub status: MatchStatus,
}

impl TableReconciliation {
    /// Build a row, deriving `status` from the two counts.
    pub fn new(
        table: impl Into<String>,
        source_file: impl Into<PathBuf>,
        source_count: Option<u64>,
        backend_count: Option<u64>,
    ) -> Self {
        let status = match (source_count, backend_count) {
            (Some(s), Some(b)) if s == b => MatchStatus::Match,
            (Some(_), Some(_)) => MatchStatus::Diff,
            _ => MatchStatus::Unknown,
        };
        Self {
            table: table.into(),
            source_file: source_file.into(),
            source_count,
            backend_count,
            status,
        }
    }
}

/// Aggregate result of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub tables: Vec<TableReconciliation>,
    pub matched: usize,
    /// Tables where both counts are known.
    pub known: usize,
    /// `floor(matched / known * 100)`; 0 when nothing could be compared.
    pub match_percentage: u32,
    pub classification: OperationStatus,
}

impl ReconciliationReport {
    /// Aggregate per-table rows into a report.
    pub fn from_tables(tables: Vec<TableReconciliation>) -> Self {
        let known = tables
            .iter()
            .filter(|t| t.status != MatchStatus::Unknown)
            .count();
        let matched = tables
            .iter()
            .filter(|t| t.status == MatchStatus::Match)
            .count();
        let match_percentage = if known == 0 {
            0
        } else {
            (matched * 100 / known) as u32
        };
        Self {
            tables,
            matched,
            known,
            match_percentage,
            classification: classify_match_percentage(match_percentage),
        }
    }

    /// Tables with at least one count missing.
    pub fn unknown(&self) -> usize {
        self.tables.len() - self.known
    }

    /// Tables whose counts differ.
    pub fn mismatches(&self) -> impl Iterator<Item = &TableReconciliation> {
        self.tables.iter().filter(|t| t.status == MatchStatus::Diff)
    }
}

impl fmt::Display for ReconciliationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} tables match ({}%), {} unknown",
            self.matched,
            self.known,
            self.match_percentage,
            self.unknown()
        )
    }
}

/// `100` → success, `[80, 100)` → warning, below 80 → error.
pub fn classify_match_percentage(percentage: u32) -> OperationStatus {
    match percentage {
        100.. => OperationStatus::Success,
        80..=99 => OperationStatus::Warning,
        _ => OperationStatus::Error,
    }
}

/// Compares source files against what the backend reports.
pub struct ReconciliationEngine<'a> {
    backend: &'a mut dyn BackendAdapter,
}

impl<'a> ReconciliationEngine<'a> {
    /// Borrow `backend` for the duration of a reconciliation pass.
    pub fn new(backend: &'a mut dyn BackendAdapter) -> Self {
        Self { backend }
    }

    /// Reconcile one file. Failed counts on either side become unknown, never zero.
    pub fn reconcile_file(&mut self, path: &Path) -> TableReconciliation {
        let table = table_name_from_path(path).unwrap_or_else(|| path.display().to_string());
        let source_count = match record_count(path) {
            Ok(n) => Some(n as u64),
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "source file could not be counted");
                None
            }
        };
        let backend_count = match self.backend.count_records(&table) {
            Ok(n) => Some(n),
            Err(e) => {
                tracing::warn!(table = %table, error = %e, "backend count unavailable");
                None
            }
        };
        let row = TableReconciliation::new(table, path, source_count, backend_count);
        tracing::debug!(
            table = %row.table,
            source = ?row.source_count,
            backend = ?row.backend_count,
            status = ?row.status,
            "reconciled"
        );
        row
    }

    /// Reconcile every file, sequentially.
    pub fn reconcile(&mut self, files: &[PathBuf]) -> ReconciliationReport {
        let tables = files.iter().map(|p| self.reconcile_file(p)).collect();
        ReconciliationReport::from_tables(tables)
    }
}
