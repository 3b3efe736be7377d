//! Read-by-position containers over records.
//!
//! Two storage layouts sit behind the same [`Sequence`] interface:
//!
//! - [`ColumnCollection`] keeps one value vector per field, keyed by field
//!   name. This is the compact layout for many rows of few fields.
//! - [`RowCollection`] keeps one [`Row`] per record.
//!
//! Callers cannot tell them apart: `get` returns the same row, `slice`
//! returns a new container of the same kind, and `append` enforces the
//! same field set.

use crate::error::{Result, TabulateError};
use crate::record::Row;
use crate::value::Value;
use std::collections::{HashMap, HashSet};
use std::ops::{Bound, RangeBounds};

/// An ordered, indexable, sliceable collection of records.
pub trait Sequence: Sized {
    /// Declared field names, in column order.
    fn fields(&self) -> &[String];

    /// Number of records.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The record at `index`, valid for `0 <= index < len()`.
    fn get(&self, index: usize) -> Result<Row>;

    /// A new container holding the records in `range`.
    ///
    /// Bounds past the end are clamped to `len()`, and a start past the
    /// end yields an empty container. The receiver is not modified.
    fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self;

    /// Add one record at the end. The row must carry exactly the declared
    /// fields, in any order.
    fn append(&mut self, row: Row) -> Result<()>;

    fn iter(&self) -> Rows<'_, Self> {
        Rows {
            seq: self,
            next: 0,
        }
    }
}

/// Iterator over the rows of a [`Sequence`].
pub struct Rows<'a, S> {
    seq: &'a S,
    next: usize,
}

impl<S: Sequence> Iterator for Rows<'_, S> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let row = self.seq.get(self.next).ok()?;
        self.next += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.seq.len().saturating_sub(self.next);
        (left, Some(left))
    }
}

impl<S: Sequence> ExactSizeIterator for Rows<'_, S> {}

/// Resolve `range` against a container of `len` records into `start..end`
/// with `start <= end <= len`.
fn resolve_range<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.saturating_add(1),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.saturating_add(1),
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };
    let end = end.min(len);
    (start.min(end), end)
}

fn check_index(index: usize, len: usize) -> Result<()> {
    if index >= len {
        return Err(TabulateError::IndexOutOfRange { index, len });
    }
    Ok(())
}

fn validate_fields(fields: &[String]) -> Result<()> {
    if fields.is_empty() {
        return Err(TabulateError::SchemaMismatch(
            "a collection needs at least one field".to_string(),
        ));
    }
    let mut seen = HashSet::new();
    for f in fields {
        if !seen.insert(f.as_str()) {
            return Err(TabulateError::SchemaMismatch(format!(
                "duplicate field name '{f}'"
            )));
        }
    }
    Ok(())
}

fn field_mismatch(expected: &[String], row: &Row) -> TabulateError {
    let got: Vec<&str> = row.names().collect();
    TabulateError::SchemaMismatch(format!(
        "record fields {got:?} do not match collection fields {expected:?}"
    ))
}

/// Records stored as one value vector per field.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCollection {
    headers: Vec<String>,
    columns: HashMap<String, Vec<Value>>,
    len: usize,
}

impl ColumnCollection {
    /// An empty collection with the given fields.
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Result<Self> {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        validate_fields(&headers)?;
        let columns = headers.iter().map(|h| (h.clone(), Vec::new())).collect();
        Ok(Self {
            headers,
            columns,
            len: 0,
        })
    }

    /// Build from parallel columns, one per header. All columns must have
    /// the same length.
    pub fn from_columns(headers: Vec<String>, columns: Vec<Vec<Value>>) -> Result<Self> {
        validate_fields(&headers)?;
        if headers.len() != columns.len() {
            return Err(TabulateError::SchemaMismatch(format!(
                "{} headers but {} columns",
                headers.len(),
                columns.len()
            )));
        }
        let len = columns.first().map_or(0, Vec::len);
        if let Some((h, c)) = headers.iter().zip(&columns).find(|(_, c)| c.len() != len) {
            return Err(TabulateError::SchemaMismatch(format!(
                "column '{h}' has {} values, expected {len}",
                c.len()
            )));
        }
        let columns = headers.iter().cloned().zip(columns).collect();
        Ok(Self {
            headers,
            columns,
            len,
        })
    }

    /// All values of one field.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    fn column_at(&self, name: &str) -> &[Value] {
        // Every header has a column; constructors and append keep them paired.
        self.columns.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Sequence for ColumnCollection {
    fn fields(&self) -> &[String] {
        &self.headers
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, index: usize) -> Result<Row> {
        check_index(index, self.len)?;
        Ok(self
            .headers
            .iter()
            .map(|h| (h.as_str(), self.column_at(h)[index].clone()))
            .collect())
    }

    fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let (start, end) = resolve_range(&range, self.len);
        let columns = self
            .columns
            .iter()
            .map(|(name, values)| (name.clone(), values[start..end].to_vec()))
            .collect();
        Self {
            headers: self.headers.clone(),
            columns,
            len: end - start,
        }
    }

    fn append(&mut self, row: Row) -> Result<()> {
        if !row.has_fields(&self.headers) {
            return Err(field_mismatch(&self.headers, &row));
        }
        for (name, value) in row.iter() {
            if let Some(column) = self.columns.get_mut(name) {
                column.push(value.clone());
            }
        }
        self.len += 1;
        Ok(())
    }
}

/// Records stored as one [`Row`] each.
#[derive(Debug, Clone, PartialEq)]
pub struct RowCollection {
    fields: Vec<String>,
    rows: Vec<Row>,
}

impl RowCollection {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Result<Self> {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        validate_fields(&fields)?;
        Ok(Self {
            fields,
            rows: Vec::new(),
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl Sequence for RowCollection {
    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn len(&self) -> usize {
        self.rows.len()
    }

    fn get(&self, index: usize) -> Result<Row> {
        check_index(index, self.rows.len())?;
        Ok(self.rows[index].clone())
    }

    fn slice<R: RangeBounds<usize>>(&self, range: R) -> Self {
        let (start, end) = resolve_range(&range, self.rows.len());
        Self {
            fields: self.fields.clone(),
            rows: self.rows[start..end].to_vec(),
        }
    }

    fn append(&mut self, row: Row) -> Result<()> {
        if !row.has_fields(&self.fields) {
            return Err(field_mismatch(&self.fields, &row));
        }
        // Store in declared field order so both layouts return identical rows.
        let ordered = self
            .fields
            .iter()
            .filter_map(|f| row.get(f).map(|v| (f.as_str(), v.clone())))
            .collect();
        self.rows.push(ordered);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride(route: &str, rides: i64) -> Row {
        Row::new()
            .with("route", route)
            .with("date", "01/01/2001")
            .with("rides", rides)
    }

    fn filled<S: Sequence>(mut seq: S) -> S {
        for (i, route) in ["3", "4", "6", "8", "9"].iter().enumerate() {
            seq.append(ride(route, 1000 + i as i64)).unwrap();
        }
        seq
    }

    fn columns() -> ColumnCollection {
        filled(ColumnCollection::new(["route", "date", "rides"]).unwrap())
    }

    fn rows() -> RowCollection {
        filled(RowCollection::new(["route", "date", "rides"]).unwrap())
    }

    fn check_get<S: Sequence>(seq: &S) {
        assert_eq!(seq.len(), 5);
        assert_eq!(seq.get(0).unwrap(), ride("3", 1000));
        assert_eq!(seq.get(4).unwrap(), ride("9", 1004));
        assert!(matches!(
            seq.get(5),
            Err(TabulateError::IndexOutOfRange { index: 5, len: 5 })
        ));
    }

    fn check_slice<S: Sequence>(seq: &S) {
        let sub = seq.slice(1..4);
        assert_eq!(sub.len(), 3);
        for k in 0..sub.len() {
            assert_eq!(sub.get(k).unwrap(), seq.get(1 + k).unwrap());
        }
        assert_eq!(seq.len(), 5);
        assert_eq!(sub.fields(), seq.fields());
    }

    fn check_append<S: Sequence>(mut seq: S) {
        let r = ride("22", 21412);
        seq.append(r.clone()).unwrap();
        assert_eq!(seq.get(seq.len() - 1).unwrap(), r);

        let bad = Row::new().with("route", "22").with("rides", 1_i64);
        assert!(matches!(
            seq.append(bad),
            Err(TabulateError::SchemaMismatch(_))
        ));
        assert_eq!(seq.len(), 6);
    }

    #[test]
    fn test_column_get() {
        check_get(&columns());
    }

    #[test]
    fn test_row_get() {
        check_get(&rows());
    }

    #[test]
    fn test_column_slice() {
        check_slice(&columns());
    }

    #[test]
    fn test_row_slice() {
        check_slice(&rows());
    }

    #[test]
    fn test_column_append() {
        check_append(columns());
    }

    #[test]
    fn test_row_append() {
        check_append(rows());
    }

    #[test]
    fn test_layouts_agree() {
        let c = columns();
        let r = rows();
        let from_columns: Vec<Row> = c.iter().collect();
        let from_rows: Vec<Row> = r.iter().collect();
        assert_eq!(from_columns, from_rows);
    }

    #[test]
    fn test_append_accepts_any_field_order() {
        let mut c = ColumnCollection::new(["route", "date", "rides"]).unwrap();
        let mut r = RowCollection::new(["route", "date", "rides"]).unwrap();
        let shuffled = Row::new()
            .with("rides", 5_i64)
            .with("route", "3")
            .with("date", "01/01/2001");
        c.append(shuffled.clone()).unwrap();
        r.append(shuffled).unwrap();
        assert_eq!(c.get(0).unwrap(), ride("3", 5));
        assert_eq!(r.get(0).unwrap(), ride("3", 5));
    }

    #[test]
    fn test_slice_clamps_bounds() {
        let c = columns();
        assert_eq!(c.slice(3..100).len(), 2);
        assert_eq!(c.slice(10..).len(), 0);
        assert_eq!(c.slice(..).len(), 5);
        assert_eq!(c.slice(..=1).len(), 2);
        #[allow(clippy::reversed_empty_ranges)]
        let empty = c.slice(4..2);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_slice_keeps_columns_aligned() {
        let c = columns().slice(2..);
        assert_eq!(c.column("route").unwrap().len(), 3);
        assert_eq!(c.column("rides").unwrap().len(), 3);
        assert_eq!(c.get(0).unwrap().get("route"), Some(&Value::from("6")));
        assert_eq!(c.get(0).unwrap().get("rides"), Some(&Value::Int(1002)));
    }

    #[test]
    fn test_slice_is_independent() {
        let original = rows();
        let mut sub = original.slice(0..2);
        sub.append(ride("99", 1)).unwrap();
        assert_eq!(sub.len(), 3);
        assert_eq!(original.len(), 5);
    }

    #[test]
    fn test_new_rejects_bad_fields() {
        assert!(ColumnCollection::new(Vec::<String>::new()).is_err());
        assert!(ColumnCollection::new(["a", "a"]).is_err());
        assert!(RowCollection::new(["a", "b", "a"]).is_err());
    }

    #[test]
    fn test_from_columns() {
        let c = ColumnCollection::from_columns(
            vec!["name".to_string(), "shares".to_string()],
            vec![
                vec![Value::from("AA"), Value::from("IBM")],
                vec![Value::Int(100), Value::Int(50)],
            ],
        )
        .unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.get(1).unwrap().get("name"), Some(&Value::from("IBM")));
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        let result = ColumnCollection::from_columns(
            vec!["name".to_string(), "shares".to_string()],
            vec![vec![Value::from("AA")], vec![]],
        );
        assert!(matches!(result, Err(TabulateError::SchemaMismatch(_))));
    }

    #[test]
    fn test_iter_size_hint() {
        let c = columns();
        let mut it = c.iter();
        assert_eq!(it.len(), 5);
        it.next();
        assert_eq!(it.len(), 4);
    }
}
