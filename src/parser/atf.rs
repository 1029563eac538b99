//! ATF layout: metadata prefix, quoted header, whitespace-delimited rows

use std::path::Path;

use crate::error::Result;
use crate::model::{Schema, Table};

use super::read_lines;

/// Number of metadata lines preceding the header in an ATF export.
pub const METADATA_LINES: usize = 2;

/// Split a raw data line into positional tokens.
///
/// Tokens are separated by runs of whitespace; leading and trailing
/// whitespace never produce empty tokens. A short row is valid — column
/// alignment pads it later.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// Build a table from the post-metadata tail of a file: the first line is the
/// quoted header, everything after it is data.
pub fn build_table(path: impl Into<std::path::PathBuf>, lines: &[String]) -> Table {
    let schema = lines
        .first()
        .map(|header| Schema::parse_header(header))
        .unwrap_or_default();
    let rows: Vec<Vec<String>> = lines.iter().skip(1).map(|l| tokenize(l)).collect();
    Table::from_rows(path, &schema, &rows)
}

/// Load one ATF file into a table, skipping the metadata prefix.
pub fn read_table(path: &Path, metadata_lines: usize) -> Result<Table> {
    let lines = read_lines(path)?;
    let tail = lines.get(metadata_lines..).unwrap_or_default();
    Ok(build_table(path, tail))
}

/// Load one ATF file as schema-independent tokenized rows, skipping the
/// metadata prefix and the header. This is the input to the reshape path,
/// which addresses fields by raw position instead of by header name.
pub fn read_data_rows(path: &Path, metadata_lines: usize) -> Result<Vec<Vec<String>>> {
    let lines = read_lines(path)?;
    Ok(lines
        .iter()
        .skip(metadata_lines + 1)
        .map(|l| tokenize(l))
        .collect())
}
