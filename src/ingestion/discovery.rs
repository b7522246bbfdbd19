//! Seed file discovery and table-name derivation.
//!
//! Seed files are named `NN_<table>.csv` where `NN` is a one- or two-digit ordering prefix. The
//! prefix decides load order; the rest of the stem is the target table.

use std::path::{Path, PathBuf};

use crate::error::{SeedError, SeedResult};

/// Split a file stem into its numeric ordering prefix and the table name.
///
/// Returns `None` for the prefix when the stem does not start with one or two digits followed by
/// an underscore.
fn split_prefix(stem: &str) -> (Option<u32>, &str) {
    let digits = stem.bytes().take_while(u8::is_ascii_digit).count();
    if (1..=2).contains(&digits) && stem.as_bytes().get(digits) == Some(&b'_') {
        let prefix = stem[..digits].parse().ok();
        (prefix, &stem[digits + 1..])
    } else {
        (None, stem)
    }
}

/// Derive the table name for a seed file: the base name with `.csv` and any leading `NN_`
/// ordering prefix stripped.
///
/// Returns `None` if the path has no file stem or the remaining name is empty.
pub fn table_name_from_path(path: impl AsRef<Path>) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let (_, table) = split_prefix(stem);
    if table.is_empty() {
        None
    } else {
        Some(table.to_owned())
    }
}

/// True when `path` matches `^[0-9]{1,2}_<table>\.csv$`.
pub fn is_seed_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == "csv");
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    let (prefix, table) = split_prefix(stem);
    is_csv && prefix.is_some() && !table.is_empty()
}

/// Find every seed file directly under `dir`, in load order.
///
/// Load order is ascending numeric prefix, then file name, so `2_x.csv` loads before `10_y.csv`.
pub fn discover_source_files(dir: impl AsRef<Path>) -> SeedResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SeedError::Conversion {
            path: dir.display().to_string(),
            message: "data directory does not exist".to_string(),
        });
    }

    let pattern = dir.join("*.csv");
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern).map_err(|e| SeedError::Conversion {
        path: dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut files: Vec<(u32, PathBuf)> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| SeedError::Io(e.into()))?;
        if !is_seed_file(&path) {
            tracing::debug!(path = %path.display(), "skipping file without ordering prefix");
            continue;
        }
        let prefix = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| split_prefix(s).0)
            .unwrap_or(u32::MAX);
        files.push((prefix, path));
    }

    files.sort();
    Ok(files.into_iter().map(|(_, p)| p).collect())
}
