use std::time::Duration;

use postgres::{Client, Config, NoTls};

use crate::encoding::{quote_ident, sql_insert_script, RowRecord};
use crate::error::{SeedError, SeedResult};
use crate::types::{BackendMode, CsvDataset};

use super::BackendAdapter;

const DISCOVER_TABLES_SQL: &str = "\
SELECT DISTINCT table_name::text
FROM information_schema.tables
WHERE table_type = 'BASE TABLE'
  AND table_schema NOT IN ('pg_catalog', 'information_schema')
  AND table_schema NOT LIKE 'pg\\_%'
  AND table_schema NOT LIKE 'hdb\\_%'
ORDER BY 1";

/// Postgres-compatible store reached over a single blocking session.
///
/// The session is opened on first use, so an unreachable server surfaces from
/// [`BackendAdapter::test_connection`] rather than from construction.
pub struct RelationalBackend {
    config: Config,
    client: Option<Client>,
}

impl RelationalBackend {
    /// Parse `url` and prepare a session with the given connect and statement timeout.
    pub fn connect(url: &str, timeout: Duration) -> SeedResult<Self> {
        let mut config: Config = url.parse().map_err(|e: postgres::Error| SeedError::Config {
            message: format!("invalid relational connection url: {e}"),
        })?;
        config.connect_timeout(timeout);
        config.options(&format!("-c statement_timeout={}", timeout.as_millis()));
        Ok(Self {
            config,
            client: None,
        })
    }

    fn session(&mut self) -> SeedResult<&mut Client> {
        if self.client.is_none() {
            let client = self
                .config
                .connect(NoTls)
                .map_err(|e| SeedError::connection(db_message(&e)))?;
            tracing::debug!("relational session opened");
            self.client = Some(client);
        }
        self.client
            .as_mut()
            .ok_or_else(|| SeedError::connection("session unavailable"))
    }

    fn count(&mut self, table: &str, operation: &'static str) -> SeedResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let row = self
            .session()?
            .query_one(sql.as_str(), &[])
            .map_err(|e| SeedError::backend(table, operation, db_message(&e)))?;
        let count: i64 = row.get(0);
        Ok(count.max(0) as u64)
    }
}

/// Server-side message when present, driver message otherwise.
fn db_message(err: &postgres::Error) -> String {
    match err.as_db_error() {
        Some(db) => db.message().to_string(),
        None => err.to_string(),
    }
}

/// `TRUNCATE TABLE "a", "b" CASCADE` over every counted table, or `None` when there is none.
pub(crate) fn truncate_statement(counted: &[(String, u64)]) -> Option<String> {
    if counted.is_empty() {
        return None;
    }
    let targets = counted
        .iter()
        .map(|(t, _)| quote_ident(t))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("TRUNCATE TABLE {targets} CASCADE"))
}

/// One result per table in `ordered`.
///
/// Counted tables report their pre-truncate count, or the truncate failure when it failed.
/// Tables that could not be counted keep their count error and were never truncated.
pub(crate) fn merge_purge_results(
    ordered: &[String],
    counted: Vec<(String, u64)>,
    uncounted: Vec<(String, SeedError)>,
    truncated: Result<(), String>,
) -> Vec<(String, SeedResult<u64>)> {
    let mut results: Vec<(String, SeedResult<u64>)> =
        uncounted.into_iter().map(|(t, e)| (t, Err(e))).collect();
    match truncated {
        Ok(()) => results.extend(counted.into_iter().map(|(table, n)| (table, Ok(n)))),
        Err(message) => {
            for (table, _) in counted {
                let err = SeedError::backend(table.as_str(), "purge", message.as_str());
                results.push((table, Err(err)));
            }
        }
    }
    // Keep the caller's order.
    results.sort_by_key(|(t, _)| ordered.iter().position(|o| o == t));
    results
}

impl BackendAdapter for RelationalBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Relational
    }

    fn test_connection(&mut self) -> SeedResult<()> {
        self.session()?
            .simple_query("SELECT 1")
            .map_err(|e| SeedError::connection(db_message(&e)))?;
        Ok(())
    }

    fn discover_tables(&mut self) -> SeedResult<Vec<String>> {
        let rows = self
            .session()?
            .query(DISCOVER_TABLES_SQL, &[])
            .map_err(|e| SeedError::backend("*", "discover", db_message(&e)))?;
        Ok(rows.iter().map(|r| r.get::<_, String>(0)).collect())
    }

    fn purge_table(&mut self, table: &str) -> SeedResult<u64> {
        let mut results = self.purge_all(&[table.to_string()]);
        match results.pop() {
            Some((_, result)) => result,
            None => Ok(0),
        }
    }

    /// Count each table, then truncate every countable table in one cascading statement.
    ///
    /// The reported purge count is the count taken just before the truncate.
    fn purge_all(&mut self, ordered: &[String]) -> Vec<(String, SeedResult<u64>)> {
        let mut counted: Vec<(String, u64)> = Vec::new();
        let mut uncounted: Vec<(String, SeedError)> = Vec::new();
        for table in ordered {
            match self.count(table, "purge") {
                Ok(n) => counted.push((table.clone(), n)),
                Err(e) => uncounted.push((table.clone(), e)),
            }
        }

        let truncated = match truncate_statement(&counted) {
            None => Ok(()),
            Some(sql) => {
                tracing::debug!(tables = counted.len(), "issuing cascading truncate");
                match self.session() {
                    Ok(client) => client.batch_execute(&sql).map_err(|e| db_message(&e)),
                    Err(e) => Err(e.to_string()),
                }
            }
        };
        merge_purge_results(ordered, counted, uncounted, truncated)
    }

    /// All rows go in one transaction; any failing statement rolls back the table.
    fn load_table(&mut self, dataset: &CsvDataset) -> SeedResult<u64> {
        if dataset.is_empty() {
            return Ok(0);
        }
        let script = sql_insert_script(&RowRecord::from_dataset(dataset));
        let table = dataset.table.as_str();

        let client = self.session()?;
        let mut tx = client
            .transaction()
            .map_err(|e| SeedError::backend(table, "load", db_message(&e)))?;
        tx.batch_execute(&script)
            .map_err(|e| SeedError::backend(table, "load", db_message(&e)))?;
        tx.commit()
            .map_err(|e| SeedError::backend(table, "load", db_message(&e)))?;
        Ok(dataset.record_count() as u64)
    }

    fn count_records(&mut self, table: &str) -> SeedResult<u64> {
        self.count(table, "count")
    }

    fn sample_accessible(&mut self, table: &str) -> SeedResult<bool> {
        let sql = format!("SELECT 1 FROM {} LIMIT 1", quote_ident(table));
        let rows = self
            .session()?
            .query(sql.as_str(), &[])
            .map_err(|e| SeedError::backend(table, "sample", db_message(&e)))?;
        Ok(!rows.is_empty())
    }
}
