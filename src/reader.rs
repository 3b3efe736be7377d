//! CSV input: header row plus typed data rows.
//!
//! Every reader here is built on [`convert_csv`], which walks the data
//! rows and hands each one to a [`RowConverter`]. Rows that fail to
//! convert are skipped and reported, both through `tracing` and as
//! [`RowDiagnostic`] values; they never abort the parse. Problems with the
//! shape of the whole input (header/conversion count mismatch, unreadable
//! source) do.

use crate::container::{ColumnCollection, Sequence};
use crate::error::{Result, TabulateError};
use crate::record::{FromRow, Row, convert_row};
use crate::value::FieldType;
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufRead, Read};
use std::marker::PhantomData;
use std::path::Path;
use tracing::{debug, warn};

/// A data row that was skipped, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct RowDiagnostic {
    /// 1-based line number in the source.
    pub line: u64,
    pub reason: String,
}

/// Converted records plus the rows that were skipped on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    /// Column names, from the header row or the caller.
    pub headers: Vec<String>,
    pub records: Vec<T>,
    pub skipped: Vec<RowDiagnostic>,
}

/// Turns one raw data row into one output record.
pub trait RowConverter {
    type Output;

    /// Check the header row before any data is read.
    fn check_headers(&self, _headers: &[String]) -> Result<()> {
        Ok(())
    }

    fn convert(&self, headers: &[String], row: &[&str]) -> Result<Self::Output>;
}

/// Produces a [`Row`] per data row using a field-type descriptor.
pub struct DictConverter<'a> {
    types: &'a [FieldType],
}

impl<'a> DictConverter<'a> {
    pub fn new(types: &'a [FieldType]) -> Self {
        Self { types }
    }
}

impl RowConverter for DictConverter<'_> {
    type Output = Row;

    fn check_headers(&self, headers: &[String]) -> Result<()> {
        if headers.len() != self.types.len() {
            return Err(TabulateError::SchemaMismatch(format!(
                "expected {} conversion functions, got {}",
                headers.len(),
                self.types.len()
            )));
        }
        Ok(())
    }

    fn convert(&self, headers: &[String], row: &[&str]) -> Result<Row> {
        let values = convert_row(headers, self.types, row)?;
        Ok(headers.iter().map(String::as_str).zip(values).collect())
    }
}

/// Produces a typed `T` per data row through [`FromRow`].
pub struct InstanceConverter<T> {
    _marker: PhantomData<T>,
}

impl<T> InstanceConverter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for InstanceConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FromRow> RowConverter for InstanceConverter<T> {
    type Output = T;

    fn check_headers(&self, headers: &[String]) -> Result<()> {
        if headers.len() != T::FIELDS.len() {
            return Err(TabulateError::SchemaMismatch(format!(
                "expected {} columns ({}), got {}",
                T::FIELDS.len(),
                T::FIELDS.join(","),
                headers.len()
            )));
        }
        Ok(())
    }

    fn convert(&self, _headers: &[String], row: &[&str]) -> Result<T> {
        let values = convert_row(T::FIELDS, T::TYPES, row)?;
        T::from_values(values)
    }
}

/// Whether a per-row error is recoverable by skipping the row.
fn is_row_error(err: &TabulateError) -> bool {
    matches!(
        err,
        TabulateError::Conversion(_)
            | TabulateError::InvalidFieldValue { .. }
            | TabulateError::SchemaMismatch(_)
    )
}

/// Decode one data row as UTF-8, field by field.
fn decode_fields(record: &ByteRecord) -> std::result::Result<Vec<&str>, String> {
    record
        .iter()
        .enumerate()
        .map(|(i, field)| {
            std::str::from_utf8(field).map_err(|e| format!("field {} is not valid UTF-8: {e}", i + 1))
        })
        .collect()
}

/// Read CSV text from `source` and convert each data row.
///
/// When `headers` is `None` the first row names the columns; otherwise
/// `headers` names them and every row is data.
pub fn convert_csv<R: Read, C: RowConverter>(
    source: R,
    converter: &C,
    headers: Option<&[&str]>,
) -> Result<Parsed<C::Output>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(headers.is_none())
        .flexible(true)
        .trim(Trim::None)
        .from_reader(source);

    let headers: Vec<String> = match headers {
        Some(names) => names.iter().map(|s| s.to_string()).collect(),
        None => reader.headers()?.iter().map(str::to_string).collect(),
    };
    converter.check_headers(&headers)?;

    let mut records = Vec::new();
    let mut skipped = Vec::new();
    for (index, result) in reader.byte_records().enumerate() {
        let record = result?;
        let line = record
            .position()
            .map_or(index as u64 + 1, |p| p.line());
        let raw = match decode_fields(&record) {
            Ok(raw) => raw,
            Err(reason) => {
                warn!(line, error = %reason, "skipping row");
                skipped.push(RowDiagnostic { line, reason });
                continue;
            }
        };
        match converter.convert(&headers, &raw) {
            Ok(output) => records.push(output),
            Err(e) if is_row_error(&e) => {
                warn!(line, error = %e, "skipping row");
                skipped.push(RowDiagnostic {
                    line,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    debug!(
        records = records.len(),
        skipped = skipped.len(),
        "converted csv rows"
    );
    Ok(Parsed {
        headers,
        records,
        skipped,
    })
}

/// Parse CSV text into a [`ColumnCollection`], skipping rows that fail
/// conversion.
pub fn parse<R: Read>(source: R, types: &[FieldType]) -> Result<ColumnCollection> {
    parse_with_report(source, types).map(|(columns, _)| columns)
}

/// Like [`parse`], also returning the skipped rows.
pub fn parse_with_report<R: Read>(
    source: R,
    types: &[FieldType],
) -> Result<(ColumnCollection, Vec<RowDiagnostic>)> {
    let parsed = convert_csv(source, &DictConverter::new(types), None)?;
    let mut columns = ColumnCollection::new(parsed.headers)?;
    for row in parsed.records {
        columns.append(row)?;
    }
    Ok((columns, parsed.skipped))
}

/// CSV text as one [`Row`] per data row.
pub fn csv_as_dicts<R: Read>(
    source: R,
    types: &[FieldType],
    headers: Option<&[&str]>,
) -> Result<Vec<Row>> {
    convert_csv(source, &DictConverter::new(types), headers).map(|p| p.records)
}

/// CSV text as one `T` per data row.
pub fn csv_as_instances<T: FromRow, R: Read>(
    source: R,
    headers: Option<&[&str]>,
) -> Result<Vec<T>> {
    convert_csv(source, &InstanceConverter::<T>::new(), headers).map(|p| p.records)
}

pub fn read_csv_as_dicts(
    path: impl AsRef<Path>,
    types: &[FieldType],
    headers: Option<&[&str]>,
) -> Result<Vec<Row>> {
    let file = File::open(path)?;
    csv_as_dicts(file, types, headers)
}

pub fn read_csv_as_instances<T: FromRow>(
    path: impl AsRef<Path>,
    headers: Option<&[&str]>,
) -> Result<Vec<T>> {
    let file = File::open(path)?;
    csv_as_instances(file, headers)
}

pub fn read_csv_as_columns(path: impl AsRef<Path>, types: &[FieldType]) -> Result<ColumnCollection> {
    let file = File::open(path)?;
    parse(file, types)
}

/// Total cost of a whitespace-separated `name shares price` listing.
///
/// Lines that do not hold an integer share count and a decimal price are
/// skipped and reported.
pub fn portfolio_cost<R: BufRead>(source: R) -> Result<(f64, Vec<RowDiagnostic>)> {
    let mut total = 0.0;
    let mut skipped = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line?;
        let lineno = index as u64 + 1;
        if line.trim().is_empty() {
            continue;
        }
        match parse_holding(&line) {
            Ok(cost) => total += cost,
            Err(reason) => {
                warn!(line = lineno, text = %line, %reason, "couldn't parse");
                skipped.push(RowDiagnostic {
                    line: lineno,
                    reason,
                });
            }
        }
    }
    Ok((total, skipped))
}

fn parse_holding(line: &str) -> std::result::Result<f64, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let [_, shares, price] = parts.as_slice() else {
        return Err(format!("expected 3 fields, got {}", parts.len()));
    };
    let shares: i64 = shares
        .parse()
        .map_err(|_| format!("invalid share count {shares:?}"))?;
    let price: f64 = price
        .parse()
        .map_err(|_| format!("invalid price {price:?}"))?;
    Ok(shares as f64 * price)
}

pub fn portfolio_cost_from_path(path: impl AsRef<Path>) -> Result<(f64, Vec<RowDiagnostic>)> {
    let file = File::open(path)?;
    portfolio_cost(std::io::BufReader::new(file))
}
