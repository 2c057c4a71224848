use std::path::PathBuf;

use thiserror::Error;

use super::model::Field;

// ---------------------------------------------------------------------------
// DataLoadError – the whole source could not be turned into a dataset
// ---------------------------------------------------------------------------

/// Fatal load failure. Nothing is returned and the previous dataset (if any)
/// stays in place.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension '.{extension}' for {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error("required column '{column}' is missing from {}", .path.display())]
    MissingColumn { path: PathBuf, column: Field },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: expected a top-level JSON array of objects", .path.display())]
    JsonShape { path: PathBuf },

    #[error("failed to decode parquet file {}: {source}", .path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("failed to read record batch from {}: {source}", .path.display())]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },
}

// ---------------------------------------------------------------------------
// MalformedValueError – a single cell could not be normalized
// ---------------------------------------------------------------------------

/// Why one record was rejected. The loader drops the row and keeps going.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedValueError {
    #[error("{field} is missing")]
    Missing { field: Field },

    #[error("{field} value {value:?} is not a number")]
    NotANumber { field: Field, value: String },

    #[error("{field} value {value} is out of range")]
    OutOfRange { field: Field, value: f64 },

    #[error("discount_percentage value {value:?} has no trailing '%'")]
    MissingPercentSign { value: String },

    /// The row itself could not be read (wrong field count, invalid UTF-8).
    #[error("unreadable row: {reason}")]
    UnreadableRow { reason: String },
}

impl MalformedValueError {
    /// The column the offending value came from, if the row got that far.
    pub fn field(&self) -> Option<Field> {
        match self {
            MalformedValueError::Missing { field }
            | MalformedValueError::NotANumber { field, .. }
            | MalformedValueError::OutOfRange { field, .. } => Some(*field),
            MalformedValueError::MissingPercentSign { .. } => Some(Field::DiscountPercentage),
            MalformedValueError::UnreadableRow { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterSpecError – rejected at construction, never silently repaired
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FilterSpecError {
    #[error("rating bound {value} is outside [0, 5]")]
    BoundOutOfRange { value: f64 },

    #[error("rating range is inverted: min {min} > max {max}")]
    Inverted { min: f64, max: f64 },
}
