//! Cell values and the per-column conversions that produce them.

use crate::error::ConversionError;
use std::fmt;
use std::str::FromStr;

/// One converted cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers widen to `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{n}"),
            // Whole decimals keep a trailing `.0`.
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:?}"),
            Value::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// Conversion applied to one column of raw text.
///
/// An ordered slice of these is a field-type descriptor: entry `i`
/// converts column `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Kept as-is.
    Text,
    /// Signed 64-bit integer; surrounding whitespace is ignored.
    Integer,
    /// 64-bit float; surrounding whitespace is ignored.
    Decimal,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
        }
    }

    /// Convert `raw` from the column named `column`.
    pub fn convert(&self, column: &str, raw: &str) -> Result<Value, ConversionError> {
        let fail = || ConversionError {
            column: column.to_string(),
            value: raw.to_string(),
            expected: self.name(),
        };
        match self {
            FieldType::Text => Ok(Value::Text(raw.to_string())),
            FieldType::Integer => raw.trim().parse().map(Value::Int).map_err(|_| fail()),
            FieldType::Decimal => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(Value::Float)
                .ok_or_else(fail),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "text" => Ok(FieldType::Text),
            "int" | "integer" => Ok(FieldType::Integer),
            "float" | "decimal" => Ok(FieldType::Decimal),
            other => Err(format!(
                "Unknown field type '{other}' (try str, int, or float)"
            )),
        }
    }
}

/// Parse a comma-separated list of type names, e.g. `"str,int,float"`.
pub fn parse_field_types(text: &str) -> Result<Vec<FieldType>, String> {
    text.split(',').map(FieldType::from_str).collect()
}
