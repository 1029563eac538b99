//! Colored terminal output

use std::io::Write;

use anyhow::Result;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::model::Value;

use super::Formatter;

/// Terminal output: a colored title line followed by a box-drawn grid.
pub struct TerminalOutput {
    /// Maximum data rows to print; the rest is summarized.
    limit: Option<usize>,
}

impl TerminalOutput {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }

    fn write_title(
        &self,
        title: &str,
        rows: usize,
        cols: usize,
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        writer.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(writer, "{}", title)?;
        writer.reset()?;
        writeln!(writer, "  ({} rows x {} columns)", rows, cols)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Formatter for TerminalOutput {
    fn render(
        &self,
        title: &str,
        columns: &[(&str, &[Value])],
        writer: &mut dyn WriteColor,
    ) -> Result<()> {
        let row_count = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        self.write_title(title, row_count, columns.len(), writer)?;

        if columns.is_empty() {
            writeln!(writer, "(no columns)")?;
            return Ok(());
        }

        let shown = self.limit.map_or(row_count, |l| l.min(row_count));

        // Transpose into display rows, header first
        let mut grid: Vec<Vec<String>> = Vec::with_capacity(shown + 1);
        grid.push(columns.iter().map(|(name, _)| name.to_string()).collect());
        for r in 0..shown {
            grid.push(
                columns
                    .iter()
                    .map(|(_, values)| {
                        values.get(r).map(|v| v.to_string()).unwrap_or_default()
                    })
                    .collect(),
            );
        }

        write!(writer, "{}", build_grid(&grid))?;

        if shown < row_count {
            writeln!(writer, "... {} more rows", row_count - shown)?;
        }
        Ok(())
    }
}

/// Build a column-aligned, box-drawn grid from display rows (header first).
fn build_grid(data: &[Vec<String>]) -> String {
    if data.is_empty() || data[0].is_empty() {
        return String::new();
    }

    let col_count = data[0].len();

    let mut col_widths: Vec<usize> = vec![0; col_count];
    for row in data {
        for (i, cell) in row.iter().enumerate() {
            if i < col_widths.len() {
                col_widths[i] = col_widths[i].max(cell.len());
            }
        }
    }

    let border = |left: char, mid: char, right: char| {
        let mut line = String::new();
        line.push(left);
        for (i, width) in col_widths.iter().enumerate() {
            line.push_str(&"─".repeat(*width + 2));
            if i < col_widths.len() - 1 {
                line.push(mid);
            }
        }
        line.push(right);
        line.push('\n');
        line
    };

    let format_row = |row: &[String]| {
        let mut line = String::from("│");
        for (i, cell) in row.iter().enumerate() {
            let width = col_widths.get(i).copied().unwrap_or(0);
            line.push_str(&format!(" {:width$} │", cell, width = width));
        }
        line.push('\n');
        line
    };

    let mut output = String::new();
    output.push_str(&border('┌', '┬', '┐'));
    output.push_str(&format_row(&data[0]));
    output.push_str(&border('├', '┼', '┤'));
    for row in data.iter().skip(1) {
        output.push_str(&format_row(row));
    }
    output.push_str(&border('└', '┴', '┘'));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::NoColor;

    #[test]
    fn test_render_truncates_at_limit() {
        let values: Vec<Value> = (0..5).map(Value::Int).collect();
        let columns: Vec<(&str, &[Value])> = vec![("amp", &values)];

        let mut buf = NoColor::new(Vec::new());
        TerminalOutput::new(Some(2))
            .render("a.atf", &columns, &mut buf)
            .unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert!(text.contains("(5 rows x 1 columns)"));
        assert!(text.contains("... 3 more rows"));
        assert!(text.contains("│ 1 │"));
        assert!(!text.contains("│ 4 │"));
    }

    #[test]
    fn test_render_empty_view() {
        let mut buf = NoColor::new(Vec::new());
        TerminalOutput::default()
            .render("empty.atf", &[], &mut buf)
            .unwrap();
        let text = String::from_utf8(buf.into_inner()).unwrap();
        assert!(text.contains("(no columns)"));
    }
}
