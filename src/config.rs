//! Layered configuration.
//!
//! Priority (highest to lowest):
//! 1. Environment variables prefixed with `SEED_` (nested keys split on `__`)
//! 2. An optional TOML file
//! 3. Built-in defaults
//!
//! A `.env` file in the working directory is read first, so its entries behave like environment
//! variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::backend::BackendConnection;
use crate::error::{SeedError, SeedResult};
use crate::pipeline::{PipelineOptions, TableScope};
use crate::purge::PurgeScheduler;
use crate::types::BackendMode;

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Directory holding the `NN_<table>.csv` seed files.
    pub data_dir: PathBuf,
    /// Backend to target.
    pub mode: BackendMode,
    /// Relational connection url, required for `relational` mode.
    pub database_url: Option<String>,
    /// GraphQL endpoint, required for `graph` mode.
    pub graph_endpoint: Option<String>,
    /// Admin secret sent to the GraphQL endpoint.
    pub admin_secret: Option<String>,
    /// Connect/request timeout in seconds.
    pub timeout_secs: u64,
    /// Replaces the built-in purge priority list when set.
    pub purge_priority: Option<Vec<String>>,
    /// Where to write the run summary JSON.
    pub summary_path: Option<PathBuf>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("seed-data"),
            mode: BackendMode::Relational,
            database_url: None,
            graph_endpoint: None,
            admin_secret: None,
            timeout_secs: 30,
            purge_priority: None,
            summary_path: None,
        }
    }
}

impl SeedConfig {
    /// Load defaults, then `file` (if given and present), then `.env` and `SEED_*` variables.
    pub fn load(file: Option<&Path>) -> SeedResult<Self> {
        let _ = dotenvy::dotenv();
        Self::figment(file).extract().map_err(|e| SeedError::Config {
            message: e.to_string(),
        })
    }

    /// The provider stack without `.env` handling; useful for inspecting merged values.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(SeedConfig::default()));
        if let Some(path) = file.filter(|p| p.exists()) {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed("SEED_").split("__"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Connection descriptor for the configured mode.
    pub fn connection(&self) -> SeedResult<BackendConnection> {
        let conn = match self.mode {
            BackendMode::Relational => {
                let url = non_empty(self.database_url.as_deref()).ok_or_else(|| SeedError::Config {
                    message: "database_url is required for relational mode".to_string(),
                })?;
                BackendConnection::relational(url)
            }
            BackendMode::Graph => {
                let endpoint =
                    non_empty(self.graph_endpoint.as_deref()).ok_or_else(|| SeedError::Config {
                        message: "graph_endpoint is required for graph mode".to_string(),
                    })?;
                BackendConnection::graph(endpoint, self.admin_secret.clone())
            }
        };
        Ok(conn.with_timeout(self.timeout()))
    }

    /// Purge scheduler honoring `purge_priority`.
    pub fn scheduler(&self) -> PurgeScheduler {
        match &self.purge_priority {
            Some(list) => PurgeScheduler::new(list.iter().cloned()),
            None => PurgeScheduler::default(),
        }
    }

    /// Pipeline options for `scope` carrying the configured summary path.
    pub fn pipeline_options(&self, scope: TableScope) -> PipelineOptions {
        PipelineOptions {
            scope,
            summary_path: self.summary_path.clone(),
            ..PipelineOptions::default()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
