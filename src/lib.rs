//! atfcrush - load, reshape, and merge ATF electrophysiology exports
//!
//! Turns fixed-layout ATF text exports (two metadata lines, a quoted header,
//! whitespace-delimited data rows) into column-oriented tables that can be
//! transformed, renamed, projected, extended with derived columns, and merged
//! across files.

pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod reshape;

pub use config::{Config, CrushPolicy};
pub use corpus::Corpus;
pub use error::{Error, Result};
pub use model::{Schema, Table, Value};
pub use reshape::ReshapeView;
