use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{SeedError, Severity};
use crate::summary::{OperationKind, OperationResult, OperationStatus};

use super::{Phase, PhaseOutcome, RunReport};

/// Observer interface for pipeline progress.
///
/// Implementors can render progress, record metrics, or feed a report. All methods default to
/// no-ops.
pub trait PipelineObserver: Send + Sync {
    /// Called when a phase begins.
    fn on_phase_started(&self, _phase: Phase) {}

    /// Called when a phase ends, including phases skipped because an earlier one failed and a
    /// purge that was declined ([`PhaseOutcome::Skipped`]).
    fn on_phase_finished(&self, _phase: Phase, _outcome: PhaseOutcome) {}

    /// Called for every per-table result as it is recorded.
    fn on_result(&self, _result: &OperationResult) {}

    /// Called when an operation fails, before its result is recorded.
    fn on_failure(&self, _table: &str, _operation: OperationKind, _severity: Severity, _error: &SeedError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, table: &str, operation: OperationKind, severity: Severity, error: &SeedError) {
        self.on_failure(table, operation, severity, error)
    }

    /// Called once with the final report.
    fn on_run_finished(&self, _report: &RunReport) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_phase_started(&self, phase: Phase) {
        for o in &self.observers {
            o.on_phase_started(phase);
        }
    }

    fn on_phase_finished(&self, phase: Phase, outcome: PhaseOutcome) {
        for o in &self.observers {
            o.on_phase_finished(phase, outcome);
        }
    }

    fn on_result(&self, result: &OperationResult) {
        for o in &self.observers {
            o.on_result(result);
        }
    }

    fn on_failure(&self, table: &str, operation: OperationKind, severity: Severity, error: &SeedError) {
        for o in &self.observers {
            o.on_failure(table, operation, severity, error);
        }
    }

    fn on_alert(&self, table: &str, operation: OperationKind, severity: Severity, error: &SeedError) {
        for o in &self.observers {
            o.on_alert(table, operation, severity, error);
        }
    }

    fn on_run_finished(&self, report: &RunReport) {
        for o in &self.observers {
            o.on_run_finished(report);
        }
    }
}

/// Emits pipeline events as `tracing` events. This is the default observer.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_phase_started(&self, phase: Phase) {
        tracing::info!(%phase, "phase started");
    }

    fn on_phase_finished(&self, phase: Phase, outcome: PhaseOutcome) {
        match outcome {
            PhaseOutcome::Succeeded => tracing::info!(%phase, "phase succeeded"),
            PhaseOutcome::Failed => tracing::error!(%phase, "phase failed"),
            PhaseOutcome::Skipped => tracing::info!(%phase, "phase skipped"),
        }
    }

    fn on_result(&self, result: &OperationResult) {
        let table = result.table.as_str();
        let operation = result.operation;
        let records = result.record_count;
        match result.status {
            OperationStatus::Success => tracing::info!(table, %operation, records, "ok"),
            OperationStatus::Warning => tracing::warn!(
                table,
                %operation,
                records,
                message = result.error.as_deref().unwrap_or_default(),
                "warning"
            ),
            OperationStatus::Error => tracing::error!(
                table,
                %operation,
                error = result.error.as_deref().unwrap_or_default(),
                "failed"
            ),
        }
    }

    fn on_alert(&self, table: &str, operation: OperationKind, severity: Severity, error: &SeedError) {
        tracing::error!(table, %operation, ?severity, %error, "ALERT");
    }

    fn on_run_finished(&self, report: &RunReport) {
        tracing::info!(
            status = ?report.status,
            phases_completed = report.phases_completed,
            phases_failed = report.phases_failed,
            errors = report.summary.error_count(),
            warnings = report.summary.warning_count(),
            "run finished"
        );
    }
}

/// Appends pipeline events to a local log file, one line per event.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", chrono::Utc::now().to_rfc3339());
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_phase_started(&self, phase: Phase) {
        self.append_line(&format!("phase={phase} started"));
    }

    fn on_phase_finished(&self, phase: Phase, outcome: PhaseOutcome) {
        self.append_line(&format!("phase={phase} outcome={outcome:?}"));
    }

    fn on_result(&self, result: &OperationResult) {
        self.append_line(&format!(
            "table={} operation={} status={:?} records={} error={}",
            result.table,
            result.operation,
            result.status,
            result.record_count,
            result.error.as_deref().unwrap_or("-")
        ));
    }

    fn on_failure(&self, table: &str, operation: OperationKind, severity: Severity, error: &SeedError) {
        self.append_line(&format!(
            "[{severity:?}] table={table} operation={operation} err={error}"
        ));
    }

    fn on_alert(&self, table: &str, operation: OperationKind, severity: Severity, error: &SeedError) {
        self.append_line(&format!(
            "[ALERT][{severity:?}] table={table} operation={operation} err={error}"
        ));
    }

    fn on_run_finished(&self, report: &RunReport) {
        self.append_line(&format!(
            "run status={:?} phases_completed={} phases_failed={}",
            report.status, report.phases_completed, report.phases_failed
        ));
    }
}
