//! Seed file discovery and CSV reading.
//!
//! - [`discovery`]: finds `NN_<table>.csv` files and derives table names
//! - [`csv`]: reads one file into a [`crate::types::CsvDataset`] and counts records

pub mod csv;
pub mod discovery;

pub use self::csv::{read_dataset, read_dataset_from_reader, reader_from_str, record_count};
pub use discovery::{discover_source_files, is_seed_file, table_name_from_path};
