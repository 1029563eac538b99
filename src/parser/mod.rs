//! Parser layer for ATF text exports

mod atf;

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

pub use atf::{build_table, read_data_rows, read_table, tokenize, METADATA_LINES};

/// Read a file into lines, tolerating invalid UTF-8.
///
/// Instrument exports occasionally contain stray non-UTF-8 bytes; those are
/// substituted with the replacement character instead of failing the load.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.lines().map(str::to_string).collect())
}
