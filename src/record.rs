//! Logical rows and typed record construction.
//!
//! A [`Row`] is the untyped view of one record: field names paired with
//! converted values, in column order. Typed records implement [`FromRow`],
//! which gives every record type the same "build one instance from one raw
//! row" entry point through [`build_from_row`].

use crate::error::{Result, TabulateError};
use crate::value::{FieldType, Value};

/// An ordered mapping from field name to value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing an existing entry in place or
    /// appending a new one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Builder form of [`Row::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when this row has exactly the fields in `names`, in any order.
    pub fn has_fields<S: AsRef<str>>(&self, names: &[S]) -> bool {
        self.fields.len() == names.len() && names.iter().all(|n| self.get(n.as_ref()).is_some())
    }

    /// Render the named fields as text, in the order given.
    pub fn select_text<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.get(n)
                    .map(|v| v.to_string())
                    .ok_or_else(|| TabulateError::SchemaMismatch(format!("no field named '{n}'")))
            })
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

/// A record type that can be built from one raw row of text.
pub trait FromRow: Sized {
    /// Field names in column order.
    const FIELDS: &'static [&'static str];
    /// Field-type descriptor, one conversion per field.
    const TYPES: &'static [FieldType];

    /// Construct from already-converted values, validating each field.
    fn from_values(values: Vec<Value>) -> Result<Self>;

    /// The untyped view of this record.
    fn to_row(&self) -> Row;
}

/// Apply `types` positionally to `raw`, naming columns by `names` in
/// conversion errors.
///
/// The three slices must have equal length.
pub fn convert_row<S: AsRef<str>>(
    names: &[S],
    types: &[FieldType],
    raw: &[&str],
) -> Result<Vec<Value>> {
    if types.len() != names.len() {
        return Err(TabulateError::SchemaMismatch(format!(
            "expected {} conversion functions, got {}",
            names.len(),
            types.len()
        )));
    }
    if raw.len() != types.len() {
        return Err(TabulateError::SchemaMismatch(format!(
            "row has {} columns, expected {}",
            raw.len(),
            types.len()
        )));
    }
    let values = names
        .iter()
        .zip(types)
        .zip(raw)
        .map(|((name, ty), cell)| ty.convert(name.as_ref(), cell))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(values)
}

/// Build one `T` from one raw row using `T`'s field-type descriptor.
pub fn build_from_row<T: FromRow>(raw: &[&str]) -> Result<T> {
    let values = convert_row(T::FIELDS, T::TYPES, raw)?;
    T::from_values(values)
}

/// Split `values` into exactly `N` items for a record constructor.
pub fn take_values<const N: usize>(values: Vec<Value>) -> Result<[Value; N]> {
    values.try_into().map_err(|v: Vec<Value>| {
        TabulateError::SchemaMismatch(format!("expected {N} values, got {}", v.len()))
    })
}

pub fn expect_text(field: &'static str, value: Value) -> Result<String> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(TabulateError::InvalidFieldValue {
            field,
            reason: format!("expected text, got {other:?}"),
        }),
    }
}

pub fn expect_int(field: &'static str, value: Value) -> Result<i64> {
    match value {
        Value::Int(n) => Ok(n),
        other => Err(TabulateError::InvalidFieldValue {
            field,
            reason: format!("expected an integer, got {other:?}"),
        }),
    }
}

pub fn expect_float(field: &'static str, value: Value) -> Result<f64> {
    match value {
        Value::Float(x) => Ok(x),
        other => Err(TabulateError::InvalidFieldValue {
            field,
            reason: format!("expected a decimal, got {other:?}"),
        }),
    }
}
