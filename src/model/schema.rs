//! Schema extraction from ATF header lines

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered, duplicate-free list of column names with by-name index lookup.
///
/// Built once per source file from its header line. The order defines both the
/// display order and the positional index used to align row tokens to columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Name -> positional index, in header order.
    fields: IndexMap<String, usize>,
}

impl Schema {
    /// Parse a header line into a schema.
    ///
    /// Field names are delimited by double quotes. Runs of whitespace inside a
    /// name collapse to single spaces, so headers that differ only in spacing
    /// produce identical schemas (instrument exports are inconsistent here).
    /// Empty and whitespace-only fragments are discarded; a duplicate name
    /// keeps its first position. A header with no quotes yields an empty
    /// schema rather than an error.
    pub fn parse_header(line: &str) -> Self {
        let mut fields = IndexMap::new();
        let names = line.split('"').filter_map(|fragment| {
            let name = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        });
        // The index is the field's position among the surviving fragments, so
        // a duplicate must still consume a slot even though it is dropped.
        for (ix, name) in names.enumerate() {
            fields.entry(name).or_insert(ix);
        }
        Self { fields }
    }

    /// Positional index of a column name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.get(name).copied()
    }

    /// Iterate `(name, index)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.fields.iter().map(|(name, &ix)| (name.as_str(), ix))
    }

    /// Column names in header order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no field names were recovered from the header.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
