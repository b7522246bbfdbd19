use thiserror::Error;

/// Convenience result type for seeding operations.
pub type SeedResult<T> = Result<T, SeedError>;

/// Error type returned across the loader.
///
/// A single enum is shared by CSV reading, both backends and the pipeline. Per-table errors are
/// recorded into the run summary rather than propagated; only [`SeedError::Connection`] stops a run.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV reader error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Relational driver error.
    #[error("postgres error: {0}")]
    Postgres(#[from] postgres::Error),

    /// HTTP transport error talking to the graph service.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encode/decode error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend could not be reached or rejected the connection check.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// A source file could not be turned into a dataset.
    #[error("cannot convert '{path}': {message}")]
    Conversion { path: String, message: String },

    /// A purge/load/count call failed against a reachable backend.
    #[error("{operation} failed for table '{table}': {message}")]
    BackendExecution {
        table: String,
        operation: &'static str,
        message: String,
    },

    /// Invalid or incomplete configuration.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Severity classification passed to observers and compared against the alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Non-fatal, recorded as a warning.
    Warning,
    /// Operation failed; the run continues.
    Error,
    /// Infrastructure failure (I/O, connectivity).
    Critical,
}

impl SeedError {
    pub(crate) fn backend(
        table: impl Into<String>,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::BackendExecution {
            table: table.into(),
            operation,
            message: message.into(),
        }
    }

    pub(crate) fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Severity used when reporting this error.
    pub fn severity(&self) -> Severity {
        match self {
            SeedError::Io(_) | SeedError::Connection { .. } => Severity::Critical,
            SeedError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(_) => Severity::Critical,
                _ => Severity::Error,
            },
            SeedError::Http(err) if err.is_connect() || err.is_timeout() => Severity::Critical,
            SeedError::Postgres(err) if err.is_closed() => Severity::Critical,
            _ => Severity::Error,
        }
    }
}
