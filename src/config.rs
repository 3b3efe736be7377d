//! Render configuration.
//!
//! Everything needed to build a [`Formatter`] lives here, so the CLI and
//! library callers describe a table the same way.

use crate::error::Result;
use crate::format::{
    ColumnFormat, CsvFormatter, Formatter, HtmlFormatter, TextFormatter, parse_column_formats,
};
use clap::ValueEnum;

/// Base table layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TableFormat {
    /// Right-aligned fixed-width columns
    #[default]
    Text,
    /// Comma-separated values
    Csv,
    /// HTML table rows
    Html,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableConfig {
    pub format: TableFormat,
    /// Per-column value formats, applied in column order.
    pub column_formats: Option<Vec<ColumnFormat>>,
    pub upper_headings: bool,
}

impl TableConfig {
    pub fn new(format: TableFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Set column formats from a comma-separated list such as `"%s,%d,%0.2f"`.
    pub fn with_column_formats(mut self, text: &str) -> Result<Self> {
        self.column_formats = Some(parse_column_formats(text)?);
        Ok(self)
    }

    pub fn with_upper_headings(mut self, upper: bool) -> Self {
        self.upper_headings = upper;
        self
    }

    pub fn build(&self) -> Formatter {
        let mut formatter = match self.format {
            TableFormat::Text => Formatter::new(TextFormatter::new()),
            TableFormat::Csv => Formatter::new(CsvFormatter::new()),
            TableFormat::Html => Formatter::new(HtmlFormatter),
        };
        if let Some(formats) = &self.column_formats {
            formatter = formatter.with_column_formats(formats.clone());
        }
        if self.upper_headings {
            formatter = formatter.with_upper_headings();
        }
        formatter
    }
}
