//! Position-indexed projection with derived fields
//!
//! The reshape path bypasses the schema entirely: the caller names a handful
//! of fields and says which 0-based token position each one comes from. It is
//! the quick route when only a few columns plus some computed ones (like an
//! inter-event interval) are needed.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::model::Value;

/// A narrow, caller-shaped view over tokenized rows.
///
/// Independent of [`crate::model::Table`] in both directions; only the
/// equal-length-columns rule carries over.
#[derive(Debug, Clone, Default)]
pub struct ReshapeView {
    fields: IndexMap<String, Vec<Value>>,
}

impl ReshapeView {
    /// Build a view by picking the mapped token positions out of every row.
    ///
    /// Rows shorter than a declared position contribute [`Value::Missing`]
    /// for that field, keeping all fields equal length.
    pub fn from_rows(rows: &[Vec<String>], mapping: &IndexMap<String, usize>) -> Self {
        let mut fields: IndexMap<String, Vec<Value>> = mapping
            .keys()
            .map(|alias| (alias.clone(), Vec::with_capacity(rows.len())))
            .collect();

        for row in rows {
            for (alias, &ix) in mapping {
                let value = match row.get(ix) {
                    Some(token) => Value::from(token.as_str()),
                    None => Value::Missing,
                };
                if let Some(field) = fields.get_mut(alias) {
                    field.push(value);
                }
            }
        }

        Self { fields }
    }

    /// Replace every value of `field` with `f(value)`. No-op when the field
    /// was never reshaped in.
    pub fn transform<F>(&mut self, field: &str, f: F)
    where
        F: Fn(&Value) -> Value,
    {
        if let Some(values) = self.fields.get_mut(field) {
            for value in values.iter_mut() {
                *value = f(value);
            }
        }
    }

    /// Attach an externally computed field.
    ///
    /// The caller is responsible for supplying exactly one value per row.
    pub fn add_field(&mut self, name: &str, values: Vec<Value>) {
        self.fields.insert(name.to_string(), values);
    }

    /// Values of a field.
    pub fn get(&self, field: &str) -> Result<&[Value]> {
        self.fields
            .get(field)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::MissingField(field.to_string()))
    }

    /// Iterate `(name, values)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of rows, from the first declared field.
    pub fn row_count(&self) -> usize {
        self.fields.first().map(|(_, v)| v.len()).unwrap_or(0)
    }
}
