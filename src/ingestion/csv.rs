//! CSV reading.
//!
//! Fields are split on the delimiter with quoting disabled: a quote character is ordinary text and
//! a field that contains a comma is split in two. Existing seed files rely on this row shape.

use std::io::Read;
use std::path::Path;

use crate::error::{SeedError, SeedResult};
use crate::types::CsvDataset;

use super::discovery::table_name_from_path;

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(b',')
        .quoting(false)
        .flexible(true);
    builder
}

/// Read a seed file into a [`CsvDataset`].
///
/// Rules:
///
/// - The first line is the header; header names are trimmed.
/// - Rows shorter than the header are padded with empty fields.
/// - Rows longer than the header keep the first `header.len()` fields and are counted in
///   [`CsvDataset::overlong_rows`].
pub fn read_dataset(path: impl AsRef<Path>) -> SeedResult<CsvDataset> {
    let path = path.as_ref();
    let table = table_name_from_path(path).ok_or_else(|| SeedError::Conversion {
        path: path.display().to_string(),
        message: "file name has no usable table name".to_string(),
    })?;
    let mut rdr = reader_builder().from_path(path)?;
    let mut dataset = read_dataset_from_reader(&mut rdr, &table)?;
    dataset.path = path.to_path_buf();
    Ok(dataset)
}

/// Read a dataset from an existing CSV reader.
pub fn read_dataset_from_reader<R: Read>(
    rdr: &mut csv::Reader<R>,
    table: &str,
) -> SeedResult<CsvDataset> {
    let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(SeedError::Conversion {
            path: table.to_owned(),
            message: "missing header line".to_string(),
        });
    }

    let width = columns.len();
    let mut rows = Vec::new();
    let mut overlong_rows = 0usize;
    for result in rdr.records() {
        let record = result?;
        if record.len() > width {
            overlong_rows += 1;
        }
        let mut row: Vec<String> = record.iter().take(width).map(str::to_owned).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(CsvDataset {
        path: Default::default(),
        table: table.to_owned(),
        columns,
        rows,
        overlong_rows,
    })
}

/// Build a CSV reader over in-memory text with the loader's split rules.
pub fn reader_from_str(input: &str) -> csv::Reader<&[u8]> {
    reader_builder().from_reader(input.as_bytes())
}

/// Count data rows in a seed file without keeping them.
pub fn record_count(path: impl AsRef<Path>) -> SeedResult<usize> {
    let mut rdr = reader_builder().from_path(path.as_ref())?;
    rdr.headers()?;
    let mut record = csv::StringRecord::new();
    let mut count = 0usize;
    while rdr.read_record(&mut record)? {
        count += 1;
    }
    Ok(count)
}
