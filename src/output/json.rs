//! JSON output format

use std::io::Write;

use anyhow::Result;
use indexmap::IndexMap;
use serde::Serialize;
use termcolor::WriteColor;

use crate::model::Value;

use super::Formatter;

/// Column-oriented JSON export of a dataset.
pub struct JsonOutput {
    pretty: bool,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct JsonDataset<'a> {
    source: &'a str,
    rows: usize,
    columns: IndexMap<&'a str, &'a [Value]>,
}

impl Formatter for JsonOutput {
    fn render(
        &self,
        title: &str,
        columns: &[(&str, &[Value])],
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let output = JsonDataset {
            source: title,
            rows: columns.first().map(|(_, v)| v.len()).unwrap_or(0),
            columns: columns.iter().map(|&(n, v)| (n, v)).collect(),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &output)?;
        } else {
            serde_json::to_writer(&mut *writer, &output)?;
        }
        writeln!(writer)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    #[test]
    fn test_render_columns_in_order() {
        let start = vec![Value::Float(1.0), Value::Float(3.0)];
        let amp = vec![Value::Int(5), Value::Missing];
        let columns: Vec<(&str, &[Value])> = vec![("start", &start), ("amp", &amp)];

        let mut buf = NoColor::new(Vec::new());
        JsonOutput::compact()
            .render("a.atf", &columns, &mut buf)
            .unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert_eq!(
            text.trim(),
            r#"{"source":"a.atf","rows":2,"columns":{"start":[1.0,3.0],"amp":[5,null]}}"#
        );
    }
}
