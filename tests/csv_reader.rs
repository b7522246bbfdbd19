use seed_loader::ingestion::{
    discover_source_files, read_dataset, read_dataset_from_reader, reader_from_str, record_count,
    table_name_from_path,
};
use seed_loader::SeedError;

mod common;
use common::SEED_DIR;

#[test]
fn read_dataset_from_path_happy_path() {
    let ds = read_dataset(format!("{SEED_DIR}/01_users.csv")).unwrap();

    assert_eq!(ds.table, "users");
    assert_eq!(ds.columns, vec!["id", "name", "email", "created_at"]);
    assert_eq!(ds.record_count(), 3);
    assert_eq!(ds.rows[2][1], "O'Brien");
    assert!(ds.path.ends_with("01_users.csv"));
}

#[test]
fn record_count_excludes_header() {
    assert_eq!(record_count(format!("{SEED_DIR}/01_users.csv")).unwrap(), 3);
    assert_eq!(record_count(format!("{SEED_DIR}/02_products.csv")).unwrap(), 2);
}

#[test]
fn header_only_file_has_zero_records() {
    let ds = read_dataset(format!("{SEED_DIR}/03_favorites.csv")).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.columns.len(), 3);
    assert_eq!(record_count(format!("{SEED_DIR}/03_favorites.csv")).unwrap(), 0);
}

#[test]
fn short_rows_are_padded_and_long_rows_truncated() {
    let ds = read_dataset(format!("{SEED_DIR}/10_orders.csv")).unwrap();
    assert_eq!(ds.table, "orders");
    assert_eq!(ds.rows[1], vec!["2", "2", "9.99", ""]);
    assert_eq!(ds.rows[2], vec!["3", "1", "5.00", "2024-02-03"]);
    assert_eq!(ds.overlong_rows, 1);
}

#[test]
fn quotes_are_not_special_and_commas_always_split() {
    let mut rdr = reader_from_str("id,note\n1,\"hello, world\"\n");
    let ds = read_dataset_from_reader(&mut rdr, "notes").unwrap();
    // The quoted comma still splits; the trailing half is dropped as an extra field.
    assert_eq!(ds.rows[0], vec!["1", "\"hello"]);
    assert_eq!(ds.overlong_rows, 1);
}

#[test]
fn crlf_line_endings_do_not_leak_into_fields() {
    let mut rdr = reader_from_str("id,name\r\n1,Ada\r\n");
    let ds = read_dataset_from_reader(&mut rdr, "people").unwrap();
    assert_eq!(ds.columns, vec!["id", "name"]);
    assert_eq!(ds.rows[0], vec!["1", "Ada"]);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = read_dataset(format!("{SEED_DIR}/99_missing.csv")).unwrap_err();
    assert!(matches!(err, SeedError::Csv(_) | SeedError::Io(_)));
}

#[test]
fn empty_input_has_no_header() {
    let mut rdr = reader_from_str("");
    let err = read_dataset_from_reader(&mut rdr, "empty").unwrap_err();
    assert!(err.to_string().contains("missing header line"));
}

#[test]
fn discovery_orders_by_numeric_prefix_and_skips_unprefixed_files() {
    let files = discover_source_files(SEED_DIR).unwrap();
    let tables: Vec<String> = files.iter().filter_map(|p| table_name_from_path(p)).collect();
    assert_eq!(tables, vec!["users", "products", "favorites", "orders"]);
}

#[test]
fn discovery_requires_an_existing_directory() {
    let err = discover_source_files("tests/fixtures/nope").unwrap_err();
    assert!(matches!(err, SeedError::Conversion { .. }));
}
