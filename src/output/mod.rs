//! Output formatting for loaded and reshaped datasets

mod json;
mod terminal;

use anyhow::Result;
use termcolor::{ColorChoice, StandardStream, WriteColor};

use crate::config::OutputFormat;
use crate::model::Value;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for dataset renderers.
///
/// Both tables and reshape views render through the same column-oriented
/// shape: a title plus ordered `(name, values)` pairs.
pub trait Formatter {
    /// Render columns to a writer.
    fn render(
        &self,
        title: &str,
        columns: &[(&str, &[Value])],
        writer: &mut dyn WriteColor,
    ) -> Result<()>;
}

/// Factory for creating formatters
pub struct FormatterFactory;

impl FormatterFactory {
    /// Create a formatter based on format type
    pub fn create(format: OutputFormat, limit: Option<usize>) -> Box<dyn Formatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new(limit)),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render columns to stdout, with colors when it is a terminal.
pub fn render_to_stdout(
    title: &str,
    columns: &[(&str, &[Value])],
    format: OutputFormat,
    limit: Option<usize>,
) -> Result<()> {
    let formatter = FormatterFactory::create(format, limit);
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    formatter.render(title, columns, &mut stdout)
}
