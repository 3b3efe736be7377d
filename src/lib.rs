//! # tabulate-rs
//!
//! Typed CSV records, sliceable record sequences, and table formatting.
//!
//! Data flows one way through three pieces:
//!
//! - **Reader**: delimited text with a header row is converted column by
//!   column through a field-type descriptor. Rows that fail conversion are
//!   skipped and reported, never fatal.
//! - **Sequence**: records are held either column-wise
//!   ([`ColumnCollection`]) or row-wise ([`RowCollection`]) behind one
//!   [`Sequence`] interface with bounds-checked `get` and non-mutating
//!   `slice`.
//! - **Formatter**: a base renderer (fixed-width text, CSV, HTML) plus
//!   optional column formats and upper-cased headings.
//!
//! ## Example
//!
//! ```
//! use tabulate_rs::{FieldType, Formatter, CsvFormatter, Sequence, parse, print_table};
//!
//! let input = "name,shares,price\nAA,100,32.20\nIBM,50,91.10\n";
//! let types = [FieldType::Text, FieldType::Integer, FieldType::Decimal];
//!
//! let portfolio = parse(input.as_bytes(), &types).unwrap();
//! assert_eq!(portfolio.len(), 2);
//!
//! let mut out = Vec::new();
//! let formatter = Formatter::new(CsvFormatter::new());
//! print_table(&portfolio.slice(1..), &["name", "shares"], &formatter, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "name,shares\nIBM,50\n");
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod format;
pub mod reader;
pub mod record;
pub mod ride;
pub mod stock;
pub mod value;

pub use config::{TableConfig, TableFormat};
pub use container::{ColumnCollection, RowCollection, Rows, Sequence};
pub use error::{ConversionError, Result, TabulateError};
pub use format::{
    COLUMN_WIDTH, ColumnFormat, CsvFormatter, FormatKind, Formatter, HtmlFormatter,
    TableFormatter, TextFormatter, Transform, create_formatter, parse_column_formats, print_rows,
    print_table,
};
pub use reader::{
    DictConverter, InstanceConverter, Parsed, RowConverter, RowDiagnostic, convert_csv,
    csv_as_dicts, csv_as_instances, parse, parse_with_report, portfolio_cost,
    portfolio_cost_from_path, read_csv_as_columns, read_csv_as_dicts, read_csv_as_instances,
};
pub use record::{FromRow, Row, build_from_row, convert_row};
pub use ride::{Ride, rides_on_route, route_count};
pub use stock::{SaleOutcome, Stock};
pub use value::{FieldType, Value, parse_field_types};
