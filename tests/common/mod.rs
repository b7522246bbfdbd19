#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};

use seed_loader::backend::BackendAdapter;
use seed_loader::types::{BackendMode, CsvDataset};
use seed_loader::{SeedError, SeedResult};

pub const SEED_DIR: &str = "tests/fixtures/seed";

/// In-memory backend that records every call.
#[derive(Default)]
pub struct RecordingBackend {
    pub tables: BTreeMap<String, u64>,
    pub calls: HashMap<&'static str, usize>,
    pub purged_order: Vec<String>,
    pub loaded: Vec<String>,
    pub fail_connect: bool,
    pub fail_discover: bool,
    pub fail_purge: HashSet<String>,
    pub fail_load: HashSet<String>,
    pub fail_count: HashSet<String>,
    /// Counts reported instead of the stored ones.
    pub count_override: HashMap<String, u64>,
}

impl RecordingBackend {
    pub fn with_tables(tables: &[(&str, u64)]) -> Self {
        Self {
            tables: tables.iter().map(|(t, n)| (t.to_string(), *n)).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self, op: &str) -> usize {
        self.calls.get(op).copied().unwrap_or(0)
    }

    fn hit(&mut self, op: &'static str) {
        *self.calls.entry(op).or_default() += 1;
    }
}

impl BackendAdapter for RecordingBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Relational
    }

    fn test_connection(&mut self) -> SeedResult<()> {
        self.hit("test_connection");
        if self.fail_connect {
            return Err(SeedError::Connection {
                message: "connection refused".into(),
            });
        }
        Ok(())
    }

    fn discover_tables(&mut self) -> SeedResult<Vec<String>> {
        self.hit("discover_tables");
        if self.fail_discover {
            return Err(SeedError::BackendExecution {
                table: "*".into(),
                operation: "discover",
                message: "permission denied".into(),
            });
        }
        Ok(self.tables.keys().cloned().collect())
    }

    fn purge_table(&mut self, table: &str) -> SeedResult<u64> {
        self.hit("purge_table");
        self.purged_order.push(table.to_string());
        if self.fail_purge.contains(table) {
            return Err(SeedError::BackendExecution {
                table: table.into(),
                operation: "purge",
                message: "foreign key violation".into(),
            });
        }
        Ok(self.tables.insert(table.to_string(), 0).unwrap_or(0))
    }

    fn purge_all(&mut self, ordered: &[String]) -> Vec<(String, SeedResult<u64>)> {
        self.hit("purge_all");
        ordered
            .iter()
            .map(|t| (t.clone(), self.purge_table(t)))
            .collect()
    }

    fn load_table(&mut self, dataset: &CsvDataset) -> SeedResult<u64> {
        self.hit("load_table");
        self.loaded.push(dataset.table.clone());
        if self.fail_load.contains(&dataset.table) {
            return Err(SeedError::BackendExecution {
                table: dataset.table.clone(),
                operation: "load",
                message: "duplicate key".into(),
            });
        }
        let n = dataset.record_count() as u64;
        *self.tables.entry(dataset.table.clone()).or_default() += n;
        Ok(n)
    }

    fn count_records(&mut self, table: &str) -> SeedResult<u64> {
        self.hit("count_records");
        if self.fail_count.contains(table) {
            return Err(SeedError::BackendExecution {
                table: table.into(),
                operation: "count",
                message: "timeout".into(),
            });
        }
        if let Some(n) = self.count_override.get(table) {
            return Ok(*n);
        }
        Ok(self.tables.get(table).copied().unwrap_or(0))
    }

    fn sample_accessible(&mut self, table: &str) -> SeedResult<bool> {
        self.hit("sample_accessible");
        Ok(self.tables.get(table).is_some_and(|n| *n > 0))
    }
}
