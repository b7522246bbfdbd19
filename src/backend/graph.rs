use std::collections::BTreeSet;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::encoding::{graph_object_list, RowRecord};
use crate::error::{SeedError, SeedResult};
use crate::types::{BackendMode, CsvDataset};

use super::BackendAdapter;

/// Header carrying the admin credential on every request.
pub const ADMIN_SECRET_HEADER: &str = "x-hasura-admin-secret";

const SCHEMA_QUERY: &str = "query { __schema { queryType { name } } }";

const ROOT_FIELDS: &str = "query { __schema { \
    queryType { fields { name } } \
    mutationType { fields { name } } } }";

/// GraphQL service exposing per-table `insert_*`, `delete_*` and `*_aggregate` operations.
///
/// Uses a blocking reqwest client; no async runtime is required.
pub struct GraphBackend {
    http: reqwest::blocking::Client,
    endpoint: String,
    admin_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphError>,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    message: String,
}

impl GraphBackend {
    /// Build a client for `endpoint` with the given request timeout.
    pub fn new(
        endpoint: impl Into<String>,
        admin_secret: Option<String>,
        timeout: Duration,
    ) -> SeedResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("seed-loader/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            admin_secret,
        })
    }

    /// POST one GraphQL document and return its `data` member.
    ///
    /// Transport failures and non-2xx statuses come back as [`SeedError::Http`]; a response with
    /// an `errors` array comes back as a message string so callers can attach table context.
    fn execute(&self, document: &str) -> SeedResult<Result<Value, String>> {
        let mut request = self.http.post(&self.endpoint).json(&json!({ "query": document }));
        if let Some(secret) = &self.admin_secret {
            request = request.header(ADMIN_SECRET_HEADER, secret);
        }
        let body: GraphResponse = request.send()?.error_for_status()?.json()?;
        if !body.errors.is_empty() {
            let message = body
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Ok(Err(message));
        }
        Ok(body.data.ok_or_else(|| "response has no data".to_string()))
    }

    /// Run a per-table document, folding every failure into a backend execution error.
    fn execute_for(&self, table: &str, operation: &'static str, document: &str) -> SeedResult<Value> {
        match self.execute(document) {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(message)) => Err(SeedError::backend(table, operation, message)),
            Err(e) => Err(SeedError::backend(table, operation, e.to_string())),
        }
    }
}

/// Table names derived from the service's root field names.
///
/// A table is any `X` that has a `delete_X` mutation and an `X` query field. Introspection
/// (`__*`), `_aggregate` and `_by_pk` fields are ignored.
pub(crate) fn tables_from_root_fields(query_fields: &[String], mutation_fields: &[String]) -> Vec<String> {
    let usable = |name: &&String| {
        !name.starts_with("__") && !name.ends_with("_aggregate") && !name.ends_with("_by_pk")
    };
    let queryable: BTreeSet<&str> = query_fields.iter().filter(usable).map(String::as_str).collect();
    mutation_fields
        .iter()
        .filter(usable)
        .filter_map(|m| m.strip_prefix("delete_"))
        .filter(|t| queryable.contains(t))
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn field_names(data: &Value, root: &str) -> Vec<String> {
    data.pointer(&format!("/__schema/{root}/fields"))
        .and_then(Value::as_array)
        .map(|fields| {
            fields
                .iter()
                .filter_map(|f| f.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

/// True for a GraphQL name: `[_A-Za-z][_0-9A-Za-z]*`.
pub(crate) fn is_graph_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first == b'_' || first.is_ascii_alphabetic() => {
            bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Reject a table or column name that cannot be spliced into a document as-is.
fn require_graph_name(table: &str, name: &str) -> SeedResult<()> {
    if is_graph_name(name) {
        Ok(())
    } else {
        Err(SeedError::Conversion {
            path: table.to_owned(),
            message: format!("'{name}' is not a valid GraphQL name"),
        })
    }
}

/// `mutation { insert_t(objects: [...]) { affected_rows } }`
pub(crate) fn insert_mutation(table: &str, records: &[RowRecord]) -> String {
    format!(
        "mutation {{ insert_{table}(objects: {}) {{ affected_rows }} }}",
        graph_object_list(records)
    )
}

/// `mutation { delete_t(where: {}) { affected_rows } }`
pub(crate) fn delete_all_mutation(table: &str) -> String {
    format!("mutation {{ delete_{table}(where: {{}}) {{ affected_rows }} }}")
}

fn affected_rows(data: &Value, field: &str) -> Option<u64> {
    data.pointer(&format!("/{field}/affected_rows"))
        .and_then(Value::as_u64)
}

impl BackendAdapter for GraphBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Graph
    }

    fn test_connection(&mut self) -> SeedResult<()> {
        let data = match self.execute(SCHEMA_QUERY) {
            Ok(Ok(data)) => data,
            Ok(Err(message)) => return Err(SeedError::connection(message)),
            Err(e) => return Err(SeedError::connection(e.to_string())),
        };
        match data.pointer("/__schema/queryType/name").and_then(Value::as_str) {
            Some(_) => Ok(()),
            None => Err(SeedError::connection("introspection response has no query type")),
        }
    }

    fn discover_tables(&mut self) -> SeedResult<Vec<String>> {
        let data = self.execute_for("*", "discover", ROOT_FIELDS)?;
        Ok(tables_from_root_fields(
            &field_names(&data, "queryType"),
            &field_names(&data, "mutationType"),
        ))
    }

    fn purge_table(&mut self, table: &str) -> SeedResult<u64> {
        require_graph_name(table, table)?;
        let data = self.execute_for(table, "purge", &delete_all_mutation(table))?;
        Ok(affected_rows(&data, &format!("delete_{table}")).unwrap_or(0))
    }

    /// One bulk insert carrying every row; the call succeeds or fails as a whole.
    fn load_table(&mut self, dataset: &CsvDataset) -> SeedResult<u64> {
        let table = dataset.table.as_str();
        require_graph_name(table, table)?;
        for column in &dataset.columns {
            require_graph_name(table, column)?;
        }
        if dataset.is_empty() {
            return Ok(0);
        }
        let document = insert_mutation(table, &RowRecord::from_dataset(dataset));
        let data = self.execute_for(table, "load", &document)?;
        Ok(affected_rows(&data, &format!("insert_{table}"))
            .unwrap_or(dataset.record_count() as u64))
    }

    fn count_records(&mut self, table: &str) -> SeedResult<u64> {
        require_graph_name(table, table)?;
        let document = format!("query {{ {table}_aggregate {{ aggregate {{ count }} }} }}");
        let data = self.execute_for(table, "count", &document)?;
        data.pointer(&format!("/{table}_aggregate/aggregate/count"))
            .and_then(Value::as_u64)
            .ok_or_else(|| SeedError::backend(table, "count", "aggregate count missing from response"))
    }

    fn sample_accessible(&mut self, table: &str) -> SeedResult<bool> {
        require_graph_name(table, table)?;
        let document = format!("query {{ {table}(limit: 1) {{ __typename }} }}");
        let data = self.execute_for(table, "sample", &document)?;
        Ok(data
            .get(table)
            .and_then(Value::as_array)
            .is_some_and(|rows| !rows.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{read_dataset_from_reader, reader_from_str};

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn discovery_requires_delete_and_query_fields() {
        let query = names(&["users", "users_aggregate", "users_by_pk", "orders", "audit_log", "__type"]);
        let mutation = names(&["delete_users", "delete_users_by_pk", "delete_orders", "insert_audit_log"]);
        assert_eq!(tables_from_root_fields(&query, &mutation), names(&["orders", "users"]));
    }

    #[test]
    fn insert_mutation_omits_null_fields() {
        let mut rdr = reader_from_str("id,name,active,price\n1,Widget,true,9.99\n,Bad,,\n");
        let ds = read_dataset_from_reader(&mut rdr, "products").unwrap();
        let doc = insert_mutation("products", &RowRecord::from_dataset(&ds));
        assert_eq!(
            doc,
            "mutation { insert_products(objects: [{id: 1, name: \"Widget\", active: true, price: 9.99}, \
             {name: \"Bad\"}]) { affected_rows } }"
        );
    }

    #[test]
    fn graph_names_follow_the_name_grammar() {
        for ok in ["users", "_meta", "order_items2", "A"] {
            assert!(is_graph_name(ok), "{ok}");
        }
        for bad in ["", "2users", "order-items", "x: 1}", "{y", "na me", "caf\u{e9}"] {
            assert!(!is_graph_name(bad), "{bad}");
        }
    }

    #[test]
    fn delete_all_uses_empty_filter() {
        assert_eq!(
            delete_all_mutation("users"),
            "mutation { delete_users(where: {}) { affected_rows } }"
        );
    }
}
