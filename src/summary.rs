//! Per-run results and the summary artifact handed to reporting.
//!
//! The JSON form of [`OperationSummary`] is:
//!
//! ```json
//! {
//!   "operations": [ ... ],
//!   "tables": { "<name>": { "operation": "load", "record_count": 10, "status": "success",
//!                           "error": null, "timestamp": "2026-01-01T00:00:00Z" } },
//!   "errors": [ ... ],
//!   "warnings": [ ... ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SeedResult;

/// What a result refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Connect,
    Purge,
    Load,
    Verify,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationKind::Connect => "connect",
            OperationKind::Purge => "purge",
            OperationKind::Load => "load",
            OperationKind::Verify => "verify",
        };
        f.write_str(s)
    }
}

/// Outcome class of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Success,
    Warning,
    Error,
}

/// One table-level outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub table: String,
    pub operation: OperationKind,
    pub record_count: u64,
    pub status: OperationStatus,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl OperationResult {
    /// Successful operation that touched `record_count` records.
    pub fn success(table: impl Into<String>, operation: OperationKind, record_count: u64) -> Self {
        Self::new(table, operation, record_count, OperationStatus::Success, None)
    }

    /// Completed operation carrying a message worth surfacing.
    pub fn warning(
        table: impl Into<String>,
        operation: OperationKind,
        record_count: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::new(
            table,
            operation,
            record_count,
            OperationStatus::Warning,
            Some(message.into()),
        )
    }

    /// Failed operation; the record count is always zero.
    pub fn error(
        table: impl Into<String>,
        operation: OperationKind,
        message: impl Into<String>,
    ) -> Self {
        Self::new(table, operation, 0, OperationStatus::Error, Some(message.into()))
    }

    fn new(
        table: impl Into<String>,
        operation: OperationKind,
        record_count: u64,
        status: OperationStatus,
        error: Option<String>,
    ) -> Self {
        Self {
            table: table.into(),
            operation,
            record_count,
            status,
            error,
            timestamp: Utc::now(),
        }
    }
}

/// Latest state per table, as stored under `tables` in the artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub operation: OperationKind,
    pub record_count: u64,
    pub status: OperationStatus,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Run-scoped accumulator of results, errors and warnings.
///
/// Owned by one pipeline run; entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub operations: Vec<OperationResult>,
    pub tables: BTreeMap<String, TableEntry>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl OperationSummary {
    /// Empty summary for a new run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a result. Error and warning messages are mirrored into the message lists.
    pub fn record(&mut self, result: OperationResult) {
        if let Some(message) = &result.error {
            let line = format!("{} {}: {}", result.operation, result.table, message);
            match result.status {
                OperationStatus::Error => self.errors.push(line),
                OperationStatus::Warning => self.warnings.push(line),
                OperationStatus::Success => {}
            }
        }
        self.tables.insert(
            result.table.clone(),
            TableEntry {
                operation: result.operation,
                record_count: result.record_count,
                status: result.status,
                error: result.error.clone(),
                timestamp: result.timestamp,
            },
        );
        self.operations.push(result);
    }

    /// Record a run-level error not tied to a table.
    pub fn add_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record a run-level warning not tied to a table.
    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Number of error messages, table-level and run-level.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warning messages, table-level and run-level.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Results of one operation kind, in recording order.
    pub fn results_for(&self, kind: OperationKind) -> impl Iterator<Item = &OperationResult> {
        self.operations.iter().filter(move |r| r.operation == kind)
    }

    /// Total records across successful results of one kind.
    pub fn total_records(&self, kind: OperationKind) -> u64 {
        self.results_for(kind)
            .filter(|r| r.status != OperationStatus::Error)
            .map(|r| r.record_count)
            .sum()
    }

    /// Write the summary artifact as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> SeedResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_mirrors_messages_and_keeps_latest_table_entry() {
        let mut summary = OperationSummary::new();
        summary.record(OperationResult::success("users", OperationKind::Purge, 4));
        summary.record(OperationResult::error("users", OperationKind::Load, "boom"));
        summary.record(OperationResult::warning("tags", OperationKind::Load, 0, "no data rows"));

        assert_eq!(summary.operations.len(), 3);
        assert_eq!(summary.error_count(), 1);
        assert_eq!(summary.warning_count(), 1);
        assert_eq!(summary.errors[0], "load users: boom");
        assert_eq!(summary.tables["users"].operation, OperationKind::Load);
        assert_eq!(summary.tables["users"].status, OperationStatus::Error);
    }

    #[test]
    fn artifact_uses_lowercase_tags() {
        let mut summary = OperationSummary::new();
        summary.record(OperationResult::success("users", OperationKind::Load, 2));
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["tables"]["users"]["status"], "success");
        assert_eq!(json["tables"]["users"]["operation"], "load");
        assert_eq!(json["tables"]["users"]["record_count"], 2);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
