//! Column-oriented table and its in-place operations

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};

use super::{Schema, Value};

/// A column-oriented dataset built from one source file.
///
/// Each column is an ordered sequence of values, index-aligned to the source
/// row order. Every operation here preserves the central invariant: all
/// columns have equal length at every point a caller observes the table.
/// A table owns its columns exclusively; merging moves data, it never aliases.
#[derive(Debug, Clone, Serialize)]
pub struct Table {
    /// Path the table was loaded from.
    path: PathBuf,
    /// File name component of `path`, used by crush predicates.
    name: String,
    /// Column name -> values, in schema order.
    columns: IndexMap<String, Vec<Value>>,
}

impl Table {
    /// Build a table from a schema and tokenized rows.
    ///
    /// For every schema field and every row, the token at the field's index is
    /// taken verbatim; rows shorter than the schema pad the tail columns with
    /// [`Value::Missing`] so row alignment survives ragged input.
    pub fn from_rows(path: impl Into<PathBuf>, schema: &Schema, rows: &[Vec<String>]) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut columns: IndexMap<String, Vec<Value>> = schema
            .names()
            .map(|n| (n.to_string(), Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            for (field, ix) in schema.iter() {
                let value = match row.get(ix) {
                    Some(token) => Value::from(token.as_str()),
                    None => Value::Missing,
                };
                if let Some(column) = columns.get_mut(field) {
                    column.push(value);
                }
            }
        }

        Self {
            path,
            name,
            columns,
        }
    }

    /// Source path of this table.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name of the source, e.g. `cell_03_ctrl.atf`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows. Derived from the first column; the alignment invariant
    /// makes every other column the same length.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|(_, v)| v.len()).unwrap_or(0)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Whether the table holds a column with this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Full value sequence of a column.
    pub fn column(&self, name: &str) -> Result<&[Value]> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    }

    /// Iterate `(name, values)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Single cell lookup; `None` when the column or row does not exist.
    pub fn get(&self, column: &str, ix: usize) -> Option<&Value> {
        self.columns.get(column).and_then(|v| v.get(ix))
    }

    /// Replace every value in `column` with `f(value)`, in place.
    ///
    /// Row count and the set of other columns are untouched. Silently does
    /// nothing when the column is absent, so bulk transforms can run across
    /// tables that do not all share every column.
    pub fn transform<F>(&mut self, column: &str, f: F)
    where
        F: Fn(&Value) -> Value,
    {
        if let Some(values) = self.columns.get_mut(column) {
            for value in values.iter_mut() {
                *value = f(value);
            }
        }
    }

    /// Rename a column, keeping its values and row order.
    ///
    /// The renamed column moves to the end of the column order. Fails when
    /// `old` does not exist; an existing `new` column is replaced.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        let values = self
            .columns
            .shift_remove(old)
            .ok_or_else(|| Error::MissingColumn(old.to_string()))?;
        self.columns.insert(new.to_string(), values);
        Ok(())
    }

    /// Project the table onto the named columns, dropping everything else.
    ///
    /// Kept columns retain their relative order and row alignment; names not
    /// present in the table are ignored. Idempotent.
    pub fn squeeze(&mut self, keep: &[&str]) {
        self.columns.retain(|name, _| keep.contains(&name.as_str()));
    }

    /// Append a derived column computed per row index.
    ///
    /// `f` receives the row index and the whole table, so a derived value can
    /// reference sibling columns at the same or a different index. The column
    /// is only attached after every row is computed. An empty table produces
    /// an empty column.
    pub fn extend<F>(&mut self, column: &str, f: F)
    where
        F: Fn(usize, &Table) -> Value,
    {
        let values: Vec<Value> = (0..self.row_count()).map(|ix| f(ix, self)).collect();
        self.columns.insert(column.to_string(), values);
    }

    /// Append another table's rows onto this one, column by column.
    ///
    /// `other` must carry every column this table has; otherwise the merge
    /// fails and the receiver is left untouched. Extra columns in `other` are
    /// dropped — the union is intentionally lossy in that one direction.
    pub fn merge(&mut self, mut other: Table) -> Result<()> {
        for name in self.columns.keys() {
            if !other.columns.contains_key(name) {
                return Err(Error::SchemaMismatch {
                    column: name.clone(),
                    other: other.name.clone(),
                });
            }
        }

        for (name, values) in self.columns.iter_mut() {
            if let Some(incoming) = other.columns.shift_remove(name) {
                values.extend(incoming);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, cols: &[(&str, &[&str])]) -> Table {
        let header = cols
            .iter()
            .map(|(n, _)| format!("\"{}\"", n))
            .collect::<Vec<_>>()
            .join(" ");
        let schema = Schema::parse_header(&header);
        let rows = if cols.is_empty() {
            vec![]
        } else {
            (0..cols[0].1.len())
                .map(|r| cols.iter().map(|(_, v)| v[r].to_string()).collect())
                .collect()
        };
        Table::from_rows(name, &schema, &rows)
    }

    #[test]
    fn test_from_rows_aligns_columns() {
        let t = table(
            "a.atf",
            &[("start", &["1", "3"]), ("end", &["2", "4"]), ("amp", &["5", "-7"])],
        );
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column("start").unwrap(), &[Value::from("1"), Value::from("3")]);
        assert_eq!(t.column("amp").unwrap(), &[Value::from("5"), Value::from("-7")]);
    }

    #[test]
    fn test_ragged_row_pads_last_column_only() {
        let schema = Schema::parse_header("\"start\" \"end\" \"amp\"");
        let rows = vec![
            vec!["1".to_string(), "2".to_string(), "5".to_string()],
            vec!["3".to_string(), "4".to_string()],
        ];
        let t = Table::from_rows("a.atf", &schema, &rows);
        assert_eq!(t.column("end").unwrap()[1], Value::from("4"));
        assert_eq!(t.column("amp").unwrap()[1], Value::Missing);
        // padding must not shift the other row
        assert_eq!(t.column("amp").unwrap()[0], Value::from("5"));
    }

    #[test]
    fn test_transform_preserves_shape() {
        let mut t = table("a.atf", &[("amp", &["5", "-7"]), ("start", &["1", "3"])]);
        t.transform("amp", |v| Value::from(v.as_f64().map(f64::abs)));
        assert_eq!(t.column("amp").unwrap(), &[Value::Float(5.0), Value::Float(7.0)]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.column_count(), 2);
        assert_eq!(t.column("start").unwrap()[0], Value::from("1"));
    }

    #[test]
    fn test_transform_missing_column_is_noop() {
        let mut t = table("a.atf", &[("amp", &["5"])]);
        t.transform("nope", |_| Value::Missing);
        assert_eq!(t.column("amp").unwrap(), &[Value::from("5")]);
    }

    #[test]
    fn test_rename_moves_values() {
        let mut t = table("a.atf", &[("amp", &["5"])]);
        t.rename("amp", "peak").unwrap();
        assert!(!t.has_column("amp"));
        assert_eq!(t.column("peak").unwrap(), &[Value::from("5")]);
        assert!(matches!(
            t.rename("amp", "x"),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_squeeze_is_idempotent() {
        let mut t = table(
            "a.atf",
            &[("a", &["1"]), ("b", &["2"]), ("c", &["3"])],
        );
        t.squeeze(&["b", "a"]);
        let once: Vec<String> = t.column_names().map(str::to_string).collect();
        t.squeeze(&["b", "a"]);
        let twice: Vec<String> = t.column_names().map(str::to_string).collect();
        assert_eq!(once, vec!["a", "b"]);
        assert_eq!(once, twice);
        assert_eq!(t.row_count(), 1);
    }

    #[test]
    fn test_extend_sees_whole_table() {
        let mut t = table("a.atf", &[("start", &["1", "3"]), ("end", &["2", "4"])]);
        t.transform("start", |v| Value::from(v.as_f64()));
        t.transform("end", |v| Value::from(v.as_f64()));
        t.extend("iei", |ix, table| {
            if ix == 0 {
                return Value::Float(0.0);
            }
            let start = table.get("start", ix).and_then(Value::as_f64);
            let end = table.get("end", ix - 1).and_then(Value::as_f64);
            match (start, end) {
                (Some(s), Some(e)) => Value::Float(s - e),
                _ => Value::Missing,
            }
        });
        assert_eq!(
            t.column("iei").unwrap(),
            &[Value::Float(0.0), Value::Float(1.0)]
        );
    }

    #[test]
    fn test_extend_on_empty_table() {
        let mut t = table("a.atf", &[("amp", &[])]);
        t.extend("derived", |_, _| Value::Float(1.0));
        assert_eq!(t.column("derived").unwrap().len(), 0);
    }

    #[test]
    fn test_merge_appends_in_row_order() {
        let mut p = table("p.atf", &[("c", &["1", "2"])]);
        let x = table("x.atf", &[("c", &["3"])]);
        let y = table("y.atf", &[("c", &["4", "5"])]);
        p.merge(x).unwrap();
        p.merge(y).unwrap();
        assert_eq!(
            p.column("c").unwrap(),
            &[
                Value::from("1"),
                Value::from("2"),
                Value::from("3"),
                Value::from("4"),
                Value::from("5"),
            ]
        );
    }

    #[test]
    fn test_merge_drops_extra_columns_in_other() {
        let mut p = table("p.atf", &[("c", &["1"])]);
        let x = table("x.atf", &[("c", &["2"]), ("extra", &["9"])]);
        p.merge(x).unwrap();
        assert_eq!(p.column_count(), 1);
        assert_eq!(p.row_count(), 2);
    }

    #[test]
    fn test_merge_rejects_missing_column() {
        let mut p = table("p.atf", &[("c", &["1"]), ("d", &["2"])]);
        let x = table("x.atf", &[("c", &["3"])]);
        let err = p.merge(x).unwrap_err();
        assert!(matches!(err, Error::SchemaMismatch { .. }));
        // receiver untouched on failure
        assert_eq!(p.row_count(), 1);
    }
}
