//! Table rendering.
//!
//! A [`TableFormatter`] knows how to turn one list of headings and one list
//! of row values into text. Three base renderers are provided:
//!
//! - [`TextFormatter`] - right-aligned fixed-width columns with a dash
//!   separator under the headings
//! - [`CsvFormatter`] - values joined by a delimiter
//! - [`HtmlFormatter`] - `<tr>` rows of `<th>`/`<td>` cells
//!
//! A [`Formatter`] wraps one base renderer with an ordered list of
//! [`Transform`]s applied before the base renderer runs: per-column value
//! formats and upper-cased headings. Transforms compose with any base.

use crate::container::Sequence;
use crate::error::{Result, TabulateError};
use crate::record::Row;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Column width used by [`TextFormatter::new`].
pub const COLUMN_WIDTH: usize = 10;

/// Base renderer: one headings block, one line per row.
pub trait TableFormatter {
    fn headings(&self, names: &[String]) -> String;
    fn row(&self, values: &[String]) -> String;
}

/// Right-aligned fixed-width columns separated by a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormatter {
    width: usize,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            width: COLUMN_WIDTH,
        }
    }

    pub fn with_width(width: usize) -> Self {
        Self { width }
    }

    fn line(&self, cells: &[String]) -> String {
        cells
            .iter()
            .map(|c| format!("{c:>width$}", width = self.width))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter for TextFormatter {
    /// Headings line followed by a dash line of the same total width.
    fn headings(&self, names: &[String]) -> String {
        let dashes = vec!["-".repeat(self.width); names.len()];
        format!("{}\n{}", self.line(names), dashes.join(" "))
    }

    fn row(&self, values: &[String]) -> String {
        self.line(values)
    }
}

/// Delimiter-joined cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFormatter {
    delimiter: String,
}

impl CsvFormatter {
    pub fn new() -> Self {
        Self::with_delimiter(",")
    }

    pub fn with_delimiter(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableFormatter for CsvFormatter {
    fn headings(&self, names: &[String]) -> String {
        names.join(&self.delimiter)
    }

    fn row(&self, values: &[String]) -> String {
        values.join(&self.delimiter)
    }
}

/// Minimal HTML table rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtmlFormatter;

fn wrap_cells(tag: &str, cells: &[String]) -> String {
    let inner: String = cells
        .iter()
        .map(|c| format!("<{tag}>{c}</{tag}>"))
        .collect();
    format!("<tr>{inner}</tr>")
}

impl TableFormatter for HtmlFormatter {
    fn headings(&self, names: &[String]) -> String {
        wrap_cells("th", names)
    }

    fn row(&self, values: &[String]) -> String {
        wrap_cells("td", values)
    }
}

/// How a [`ColumnFormat`] interprets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatKind {
    /// `%s`: the text as-is.
    Str,
    /// `%d`: an integer.
    Int,
    /// `%f`: a decimal, six places unless a precision is given.
    Float,
}

/// A printf-style format for one column: `%[-|0][width][.precision](s|d|f)`.
///
/// Examples: `%s`, `%d`, `%0.2f`, `%10.2f`, `%-8s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFormat {
    kind: FormatKind,
    width: Option<usize>,
    precision: Option<usize>,
    left: bool,
    zero: bool,
}

impl ColumnFormat {
    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// Format `value` with this column format.
    pub fn apply(&self, value: &str) -> Result<String> {
        let body = match self.kind {
            FormatKind::Str => match self.precision {
                Some(p) => value.chars().take(p).collect(),
                None => value.to_string(),
            },
            FormatKind::Int => {
                let text = value.trim();
                let n: i64 = match text.parse() {
                    Ok(n) => n,
                    // Decimal text truncates toward zero, as printf's `%d` does.
                    Err(_) => match text.parse::<f64>() {
                        Ok(x) if x.is_finite() => x.trunc() as i64,
                        _ => {
                            return Err(TabulateError::InvalidFormat(format!(
                                "{value:?} is not a number ({self})"
                            )));
                        }
                    },
                };
                n.to_string()
            }
            FormatKind::Float => {
                let x: f64 = value.trim().parse().map_err(|_| {
                    TabulateError::InvalidFormat(format!("{value:?} is not a number ({self})"))
                })?;
                format!("{x:.prec$}", prec = self.precision.unwrap_or(6))
            }
        };
        Ok(self.pad(body))
    }

    fn pad(&self, body: String) -> String {
        let Some(width) = self.width else {
            return body;
        };
        let len = body.chars().count();
        if len >= width {
            return body;
        }
        let fill = width - len;
        if self.left {
            format!("{body}{}", " ".repeat(fill))
        } else if self.zero && self.kind != FormatKind::Str {
            match body.strip_prefix('-') {
                Some(digits) => format!("-{}{digits}", "0".repeat(fill)),
                None => format!("{}{body}", "0".repeat(fill)),
            }
        } else {
            format!("{}{body}", " ".repeat(fill))
        }
    }
}

impl FromStr for ColumnFormat {
    type Err = TabulateError;

    fn from_str(spec: &str) -> Result<Self> {
        let bad = || TabulateError::InvalidFormat(format!("bad column format {spec:?}"));
        let mut rest = spec.trim().strip_prefix('%').ok_or_else(bad)?;

        let mut left = false;
        let mut zero = false;
        while let Some(flag) = rest.chars().next() {
            match flag {
                '-' => left = true,
                '0' => zero = true,
                _ => break,
            }
            rest = &rest[1..];
        }

        let kind = match rest.chars().last().ok_or_else(bad)? {
            's' => FormatKind::Str,
            'd' | 'i' => FormatKind::Int,
            'f' => FormatKind::Float,
            _ => return Err(bad()),
        };
        let numbers = &rest[..rest.len() - 1];

        let parse_num = |s: &str| -> Result<Option<usize>> {
            if s.is_empty() {
                Ok(None)
            } else {
                s.parse().map(Some).map_err(|_| bad())
            }
        };
        let (width, precision) = match numbers.split_once('.') {
            Some((w, p)) => (parse_num(w)?, Some(parse_num(p)?.unwrap_or(0))),
            None => (parse_num(numbers)?, None),
        };

        Ok(Self {
            kind,
            width,
            precision,
            left,
            zero,
        })
    }
}

impl fmt::Display for ColumnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("%")?;
        if self.left {
            f.write_str("-")?;
        }
        if self.zero {
            f.write_str("0")?;
        }
        if let Some(w) = self.width {
            write!(f, "{w}")?;
        }
        if let Some(p) = self.precision {
            write!(f, ".{p}")?;
        }
        let conv = match self.kind {
            FormatKind::Str => 's',
            FormatKind::Int => 'd',
            FormatKind::Float => 'f',
        };
        write!(f, "{conv}")
    }
}

/// Parse a comma-separated list of column formats, e.g. `"%s,%d,%0.2f"`.
pub fn parse_column_formats(text: &str) -> Result<Vec<ColumnFormat>> {
    text.split(',').map(ColumnFormat::from_str).collect()
}

/// A modification applied before the base renderer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Format row values column by column. Headings pass through.
    ColumnFormats(Vec<ColumnFormat>),
    /// Upper-case headings. Row values pass through.
    UpperHeadings,
}

impl Transform {
    fn headings(&self, names: Vec<String>) -> Vec<String> {
        match self {
            Transform::ColumnFormats(_) => names,
            Transform::UpperHeadings => names.into_iter().map(|n| n.to_uppercase()).collect(),
        }
    }

    fn row(&self, values: Vec<String>) -> Result<Vec<String>> {
        match self {
            Transform::ColumnFormats(formats) => {
                check_shape(formats.len(), values.len())?;
                formats
                    .iter()
                    .zip(&values)
                    .map(|(f, v)| f.apply(v))
                    .collect()
            }
            Transform::UpperHeadings => Ok(values),
        }
    }
}

fn check_shape(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(TabulateError::ShapeMismatch { expected, actual });
    }
    Ok(())
}

/// A base renderer plus its transforms.
pub struct Formatter {
    base: Box<dyn TableFormatter>,
    transforms: Vec<Transform>,
}

impl Formatter {
    pub fn new(base: impl TableFormatter + 'static) -> Self {
        Self {
            base: Box::new(base),
            transforms: Vec::new(),
        }
    }

    /// Append `transform`; transforms run in the order they were added.
    pub fn with(mut self, transform: Transform) -> Self {
        self.transforms.push(transform);
        self
    }

    pub fn with_column_formats(self, formats: Vec<ColumnFormat>) -> Self {
        self.with(Transform::ColumnFormats(formats))
    }

    pub fn with_upper_headings(self) -> Self {
        self.with(Transform::UpperHeadings)
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Check that every column-format transform covers exactly `columns`
    /// columns.
    pub fn check_width(&self, columns: usize) -> Result<()> {
        for transform in &self.transforms {
            if let Transform::ColumnFormats(formats) = transform {
                check_shape(formats.len(), columns)?;
            }
        }
        Ok(())
    }

    pub fn headings<S: AsRef<str>>(&self, names: &[S]) -> String {
        let names = self
            .transforms
            .iter()
            .fold(to_strings(names), |acc, t| t.headings(acc));
        self.base.headings(&names)
    }

    pub fn row<S: AsRef<str>>(&self, values: &[S]) -> Result<String> {
        let values = self
            .transforms
            .iter()
            .try_fold(to_strings(values), |acc, t| t.row(acc))?;
        Ok(self.base.row(&values))
    }

    /// Render headings and rows, one block per line. Every row must have
    /// as many values as there are headings.
    pub fn render<S: AsRef<str>, V: AsRef<str>>(
        &self,
        headings: &[S],
        rows: &[Vec<V>],
    ) -> Result<String> {
        self.check_width(headings.len())?;
        let mut lines = vec![self.headings(headings)];
        for values in rows {
            check_shape(headings.len(), values.len())?;
            lines.push(self.row(values)?);
        }
        Ok(lines.join("\n"))
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("transforms", &self.transforms)
            .finish_non_exhaustive()
    }
}

fn to_strings<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().to_string()).collect()
}

/// Build a formatter by name: `text`, `csv`, or `html`.
pub fn create_formatter(
    name: &str,
    column_formats: Option<Vec<ColumnFormat>>,
    upper_headings: bool,
) -> Result<Formatter> {
    let mut formatter = match name.to_ascii_lowercase().as_str() {
        "text" | "txt" => Formatter::new(TextFormatter::new()),
        "csv" => Formatter::new(CsvFormatter::new()),
        "html" => Formatter::new(HtmlFormatter),
        other => {
            return Err(TabulateError::InvalidFormat(format!(
                "unknown table format '{other}' (try text, csv, or html)"
            )));
        }
    };
    if let Some(formats) = column_formats {
        formatter = formatter.with_column_formats(formats);
    }
    if upper_headings {
        formatter = formatter.with_upper_headings();
    }
    Ok(formatter)
}

/// Write `fields` of each row in `rows` as a table.
///
/// Nothing is written if the formatter's column formats do not match
/// `fields`.
pub fn print_rows<S, W>(
    rows: impl IntoIterator<Item = Row>,
    fields: &[S],
    formatter: &Formatter,
    out: &mut W,
) -> Result<()>
where
    S: AsRef<str>,
    W: Write,
{
    formatter.check_width(fields.len())?;
    writeln!(out, "{}", formatter.headings(fields))?;
    for row in rows {
        let values = row.select_text(fields)?;
        writeln!(out, "{}", formatter.row(&values)?)?;
    }
    Ok(())
}

/// Write `fields` of every record in `seq` as a table.
///
/// Every requested field must be one of the sequence's fields, and any
/// column formats must cover exactly `fields`; nothing is written otherwise.
pub fn print_table<Q, S, W>(seq: &Q, fields: &[S], formatter: &Formatter, out: &mut W) -> Result<()>
where
    Q: Sequence,
    S: AsRef<str>,
    W: Write,
{
    let wanted: Vec<&str> = fields.iter().map(|f| f.as_ref()).collect();
    if let Some(missing) = wanted
        .iter()
        .find(|f| !seq.fields().iter().any(|s| s == **f))
    {
        return Err(TabulateError::SchemaMismatch(format!(
            "no field named '{missing}'"
        )));
    }
    print_rows(seq.iter(), fields, formatter, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::RowCollection;
    use crate::record::FromRow;
    use crate::stock::Stock;

    const HEADINGS: [&str; 3] = ["name", "shares", "price"];
    const ROW: [&str; 3] = ["IBM", "100", "50.5"];

    fn formats(text: &str) -> Vec<ColumnFormat> {
        parse_column_formats(text).unwrap()
    }

    #[test]
    fn test_csv_formatter() {
        let f = Formatter::new(CsvFormatter::new());
        assert_eq!(f.headings(&HEADINGS), "name,shares,price");
        assert_eq!(f.row(&ROW).unwrap(), "IBM,100,50.5");
    }

    #[test]
    fn test_text_formatter() {
        let f = Formatter::new(TextFormatter::new());
        let headings = f.headings(&HEADINGS);
        let lines: Vec<&str> = headings.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "      name     shares      price");
        assert_eq!(lines[1], "---------- ---------- ----------");
        assert_eq!(lines[0].len(), lines[1].len());
        assert_eq!(f.row(&ROW).unwrap(), "       IBM        100       50.5");
    }

    #[test]
    fn test_html_formatter() {
        let f = Formatter::new(HtmlFormatter);
        assert_eq!(
            f.headings(&HEADINGS),
            "<tr><th>name</th><th>shares</th><th>price</th></tr>"
        );
        assert_eq!(
            f.row(&ROW).unwrap(),
            "<tr><td>IBM</td><td>100</td><td>50.5</td></tr>"
        );
    }

    #[test]
    fn test_upper_headings_composes_with_any_base() {
        let csv = Formatter::new(CsvFormatter::new()).with_upper_headings();
        assert_eq!(csv.headings(&HEADINGS), "NAME,SHARES,PRICE");
        assert_eq!(csv.row(&ROW).unwrap(), "IBM,100,50.5");

        let html = Formatter::new(HtmlFormatter).with_upper_headings();
        assert!(html.headings(&HEADINGS).contains("<th>SHARES</th>"));
    }

    #[test]
    fn test_column_formats() {
        let f = Formatter::new(CsvFormatter::new()).with_column_formats(formats("%s,%d,%0.2f"));
        assert_eq!(f.headings(&HEADINGS), "name,shares,price");
        assert_eq!(f.row(&ROW).unwrap(), "IBM,100,50.50");
    }

    #[test]
    fn test_column_formats_with_text_base() {
        let f = Formatter::new(TextFormatter::new()).with_column_formats(formats("%s,%d,%0.2f"));
        assert_eq!(f.row(&ROW).unwrap(), "       IBM        100      50.50");
    }

    #[test]
    fn test_column_formats_shape_mismatch() {
        let f = Formatter::new(CsvFormatter::new()).with_column_formats(formats("%s,%d"));
        assert!(matches!(
            f.row(&ROW),
            Err(TabulateError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_int_format_truncates_decimal_text() {
        let f: ColumnFormat = "%d".parse().unwrap();
        assert_eq!(f.apply("50.5").unwrap(), "50");
        assert_eq!(f.apply("-7.9").unwrap(), "-7");
        assert!(matches!(f.apply("inf"), Err(TabulateError::InvalidFormat(_))));
    }

    #[test]
    fn test_check_width() {
        let f = Formatter::new(CsvFormatter::new())
            .with_upper_headings()
            .with_column_formats(formats("%s,%d"));
        assert!(f.check_width(2).is_ok());
        assert!(matches!(
            f.check_width(3),
            Err(TabulateError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert!(Formatter::new(HtmlFormatter).check_width(5).is_ok());
    }

    #[test]
    fn test_column_format_rejects_non_numeric() {
        let f = Formatter::new(CsvFormatter::new()).with_column_formats(formats("%s,%d,%f"));
        assert!(matches!(
            f.row(&["IBM", "many", "1.0"]),
            Err(TabulateError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_render_shape_mismatch() {
        let f = Formatter::new(CsvFormatter::new());
        let rows = vec![vec!["IBM", "100"]];
        assert!(matches!(
            f.render(&HEADINGS, &rows),
            Err(TabulateError::ShapeMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_render() {
        let f = Formatter::new(CsvFormatter::new());
        let rows = vec![ROW.to_vec(), vec!["AA", "50", "32.2"]];
        assert_eq!(
            f.render(&HEADINGS, &rows).unwrap(),
            "name,shares,price\nIBM,100,50.5\nAA,50,32.2"
        );
    }

    #[test]
    fn test_parse_column_format() {
        let f: ColumnFormat = "%10.2f".parse().unwrap();
        assert_eq!(f.kind(), FormatKind::Float);
        assert_eq!(f.apply("3.14159").unwrap(), "      3.14");
        assert_eq!(f.to_string(), "%10.2f");

        let f: ColumnFormat = "%-6s".parse().unwrap();
        assert_eq!(f.apply("AA").unwrap(), "AA    ");

        let f: ColumnFormat = "%05d".parse().unwrap();
        assert_eq!(f.apply("42").unwrap(), "00042");
        assert_eq!(f.apply("-42").unwrap(), "-0042");

        let f: ColumnFormat = "%f".parse().unwrap();
        assert_eq!(f.apply("1.5").unwrap(), "1.500000");

        let f: ColumnFormat = "%.2s".parse().unwrap();
        assert_eq!(f.apply("IBM").unwrap(), "IB");
    }

    #[test]
    fn test_parse_column_format_errors() {
        for bad in ["s", "%", "%q", "%1x2d", "%.xf"] {
            assert!(
                bad.parse::<ColumnFormat>().is_err(),
                "expected {bad:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_create_formatter() {
        let f = create_formatter("csv", Some(formats("%s,%d,%0.1f")), true).unwrap();
        assert_eq!(f.headings(&HEADINGS), "NAME,SHARES,PRICE");
        assert_eq!(f.row(&ROW).unwrap(), "IBM,100,50.5");
        assert_eq!(f.transforms().len(), 2);

        assert!(create_formatter("HTML", None, false).is_ok());
        assert!(matches!(
            create_formatter("xml", None, false),
            Err(TabulateError::InvalidFormat(_))
        ));
    }

    fn portfolio() -> RowCollection {
        let mut seq = RowCollection::new(Stock::FIELDS.iter().copied()).unwrap();
        for s in [
            Stock::new("AA", 100, 32.2).unwrap(),
            Stock::new("IBM", 50, 91.1).unwrap(),
        ] {
            seq.append(s.to_row()).unwrap();
        }
        seq
    }

    #[test]
    fn test_print_table() {
        let f = create_formatter("csv", None, false).unwrap();
        let mut out = Vec::new();
        print_table(&portfolio(), &["name", "price"], &f, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,price\nAA,32.2\nIBM,91.1\n"
        );
    }

    #[test]
    fn test_print_table_unknown_field() {
        let f = create_formatter("text", None, false).unwrap();
        let mut out = Vec::new();
        let result = print_table(&portfolio(), &["name", "cost"], &f, &mut out);
        assert!(matches!(result, Err(TabulateError::SchemaMismatch(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn test_print_table_format_count_mismatch_writes_nothing() {
        let f = create_formatter("csv", Some(formats("%s,%d")), false).unwrap();
        let mut out = Vec::new();
        let result = print_table(&portfolio(), &["name", "shares", "price"], &f, &mut out);
        assert!(matches!(
            result,
            Err(TabulateError::ShapeMismatch {
                expected: 2,
                actual: 3
            })
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_render_format_count_mismatch() {
        let f = Formatter::new(TextFormatter::new()).with_column_formats(formats("%s"));
        let rows: Vec<Vec<&str>> = Vec::new();
        assert!(matches!(
            f.render(&HEADINGS, &rows),
            Err(TabulateError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_print_rows_from_records() {
        let f = create_formatter("text", Some(formats("%s,%d,%0.2f")), false).unwrap();
        let stocks = [Stock::new("CAT", 150, 83.44).unwrap()];
        let mut out = Vec::new();
        print_rows(stocks.iter().map(Stock::to_row), Stock::FIELDS, &f, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().nth(2), Some("       CAT        150      83.44"));
    }
}
