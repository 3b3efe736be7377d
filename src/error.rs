//! Error types for reading, indexing, and rendering records.

use thiserror::Error;

/// A single cell that could not be converted to its declared field type.
///
/// Conversion failures are row-local: the reader skips the row and reports
/// this value instead of aborting the parse.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("column '{column}': cannot convert {value:?} to {expected}")]
pub struct ConversionError {
    pub column: String,
    pub value: String,
    pub expected: &'static str,
}

/// Errors produced by the reader, the sequence containers, the records,
/// and the formatters.
#[derive(Debug, Error)]
pub enum TabulateError {
    /// Declared fields or conversions do not match the shape of the data.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A cell failed conversion while building a single record.
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Positional access outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Formatter input sequences of unequal length.
    #[error("shape mismatch: expected {expected} values, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// A record setter received a value outside its type or domain.
    #[error("invalid value for '{field}': {reason}")]
    InvalidFieldValue { field: &'static str, reason: String },

    /// Unknown formatter name, bad column format spec, or a value that
    /// does not fit its numeric format.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TabulateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_error_message() {
        let err = ConversionError {
            column: "shares".to_string(),
            value: "abc".to_string(),
            expected: "integer",
        };
        assert_eq!(
            err.to_string(),
            r#"column 'shares': cannot convert "abc" to integer"#
        );
    }

    #[test]
    fn test_conversion_converts_into_tabulate_error() {
        let err: TabulateError = ConversionError {
            column: "price".to_string(),
            value: "x".to_string(),
            expected: "decimal",
        }
        .into();
        assert!(matches!(err, TabulateError::Conversion(_)));
    }

    #[test]
    fn test_index_out_of_range_message() {
        let err = TabulateError::IndexOutOfRange { index: 5, len: 3 };
        assert_eq!(err.to_string(), "index 5 out of range for length 3");
    }
}
