//! Error types for the ATF ETL core

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by table and corpus operations.
///
/// Ragged rows and invalid byte sequences are recovered locally (missing-value
/// padding, lossy decoding) and never reach this enum.
#[derive(Debug, Error)]
pub enum Error {
    /// A named column was requested from a table that does not have it.
    #[error("column not found: {0}")]
    MissingColumn(String),

    /// A named field was requested from a reshape view that never declared it.
    #[error("field not found in reshape view: {0}")]
    MissingField(String),

    /// A merge was attempted between tables whose column sets are incompatible.
    #[error("schema mismatch on merge: column '{column}' missing from '{other}'")]
    SchemaMismatch { column: String, other: String },

    /// A source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
