use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use seed_loader::backend::{connect, BackendAdapter, BackendConnection, GraphBackend, ADMIN_SECRET_HEADER};
use seed_loader::ingestion::{read_dataset_from_reader, reader_from_str};
use seed_loader::SeedError;

const PATH: &str = "/v1/graphql";

fn backend(server: &MockServer) -> GraphBackend {
    GraphBackend::new(server.url(PATH), Some("s3cret".into()), Duration::from_secs(5)).unwrap()
}

#[test]
fn connection_check_sends_admin_secret() {
    let server = MockServer::start();
    let check = server.mock(|when, then| {
        when.method(POST).path(PATH).header(ADMIN_SECRET_HEADER, "s3cret");
        then.status(200)
            .json_body(json!({ "data": { "__schema": { "queryType": { "name": "query_root" } } } }));
    });

    backend(&server).test_connection().unwrap();
    check.assert();
}

#[test]
fn rejected_secret_is_a_connection_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(401).json_body(json!({ "error": "invalid x-hasura-admin-secret" }));
    });

    let err = backend(&server).test_connection().unwrap_err();
    assert!(matches!(err, SeedError::Connection { .. }), "{err}");
}

#[test]
fn graphql_errors_surface_as_backend_execution_errors() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({
            "errors": [
                { "message": "field 'delete_users' not found in type: 'mutation_root'" },
                { "message": "second" }
            ]
        }));
    });

    let err = backend(&server).purge_table("users").unwrap_err();
    match err {
        SeedError::BackendExecution { table, operation, message } => {
            assert_eq!(table, "users");
            assert_eq!(operation, "purge");
            assert!(message.contains("delete_users"));
            assert!(message.ends_with("; second"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn count_reads_the_aggregate() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .json_body(json!({ "data": { "users_aggregate": { "aggregate": { "count": 42 } } } }));
    });

    assert_eq!(backend(&server).count_records("users").unwrap(), 42);
}

#[test]
fn discovery_pairs_delete_mutations_with_query_fields() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({
            "data": { "__schema": {
                "queryType": { "fields": [
                    { "name": "users" }, { "name": "users_aggregate" }, { "name": "users_by_pk" },
                    { "name": "orders" }, { "name": "report_view" }
                ] },
                "mutationType": { "fields": [
                    { "name": "delete_users" }, { "name": "delete_users_by_pk" },
                    { "name": "insert_users" }, { "name": "delete_orders" }
                ] }
            } }
        }));
    });

    let tables = backend(&server).discover_tables().unwrap();
    assert_eq!(tables, vec!["orders".to_string(), "users".to_string()]);
}

#[test]
fn load_reports_affected_rows() {
    let server = MockServer::start();
    let insert = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .json_body(json!({ "data": { "insert_products": { "affected_rows": 2 } } }));
    });

    let mut rdr = reader_from_str("id,name\n1,Widget\n2,Gadget\n");
    let ds = read_dataset_from_reader(&mut rdr, "products").unwrap();
    assert_eq!(backend(&server).load_table(&ds).unwrap(), 2);
    insert.assert_hits(1);
}

#[test]
fn empty_dataset_makes_no_request() {
    let server = MockServer::start();
    let insert = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({ "data": {} }));
    });

    let mut rdr = reader_from_str("id,name\n");
    let ds = read_dataset_from_reader(&mut rdr, "products").unwrap();
    assert_eq!(backend(&server).load_table(&ds).unwrap(), 0);
    insert.assert_hits(0);
}

#[test]
fn sample_checks_for_a_returned_row() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200)
            .json_body(json!({ "data": { "users": [ { "__typename": "users" } ] } }));
    });

    assert!(backend(&server).sample_accessible("users").unwrap());
}

#[test]
fn connect_builds_a_graph_adapter() {
    let server = MockServer::start();
    let conn = BackendConnection::graph(server.url(PATH), None);
    let adapter = connect(&conn).unwrap();
    assert_eq!(adapter.mode(), conn.mode());
}

#[test]
fn header_that_is_not_a_graph_name_is_rejected_before_sending() {
    let server = MockServer::start();
    let insert = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({ "data": { "insert_users": { "affected_rows": 1 } } }));
    });

    let mut rdr = reader_from_str("id,x: 1}, {y\n5,7\n");
    let ds = read_dataset_from_reader(&mut rdr, "users").unwrap();
    let err = backend(&server).load_table(&ds).unwrap_err();

    match err {
        SeedError::Conversion { path, message } => {
            assert_eq!(path, "users");
            assert!(message.contains("x: 1}"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
    insert.assert_hits(0);
}

#[test]
fn table_name_that_is_not_a_graph_name_is_rejected_before_sending() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(POST).path(PATH);
        then.status(200).json_body(json!({ "data": {} }));
    });

    let mut graph = backend(&server);
    assert!(matches!(graph.purge_table("order-items"), Err(SeedError::Conversion { .. })));
    assert!(matches!(graph.count_records("order-items"), Err(SeedError::Conversion { .. })));
    assert!(matches!(graph.sample_accessible("1users"), Err(SeedError::Conversion { .. })));
    any.assert_hits(0);
}
