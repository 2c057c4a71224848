use std::fs::File;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::error::{DataLoadError, MalformedValueError};
use super::model::{DroppedRecord, Field, LoadedDataset, RawRecord, RecordSet};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a product dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one product per line (recommended)
/// * `.json`    – `[{ "category": "...", "rating": 4.1, ... }, ...]`
/// * `.parquet` – one column per field; text or numeric cells
///
/// Rows whose cells cannot be normalized are dropped and reported in
/// [`LoadedDataset::dropped`]; only file-level problems fail the load.
pub fn load_file(path: &Path) -> Result<LoadedDataset, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        _ => {
            return Err(DataLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: ext,
            })
        }
    };

    if !dataset.dropped.is_empty() {
        log::warn!(
            "Dropped {} malformed row(s) from {}",
            dataset.dropped_count(),
            path.display()
        );
        for dropped in &dataset.dropped {
            log::debug!("row {}: {}", dropped.row, dropped.error);
        }
    }
    log::info!(
        "Loaded {} products in {} categories from {}",
        dataset.len(),
        dataset.categories.len(),
        path.display()
    );
    Ok(dataset)
}

/// Normalize raw rows, splitting them into kept records and dropped rows.
/// A row that could not even be read arrives as an `Err` and is dropped too.
fn normalize_rows(
    path: &Path,
    rows: impl IntoIterator<Item = Result<RawRecord, MalformedValueError>>,
) -> LoadedDataset {
    let mut records = Vec::new();
    let mut dropped = Vec::new();

    for (i, row) in rows.into_iter().enumerate() {
        match row.and_then(|raw| raw.normalize()) {
            Ok(record) => records.push(record),
            Err(error) => dropped.push(DroppedRecord { row: i + 1, error }),
        }
    }

    LoadedDataset::new(path.to_path_buf(), RecordSet::new(records), dropped)
}

fn open(path: &Path) -> Result<File, DataLoadError> {
    File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, matched after trimming.
/// Extra columns are ignored. A data row with the wrong number of fields or
/// invalid UTF-8 is dropped; header and I/O failures abort the load.
fn load_csv(path: &Path) -> Result<LoadedDataset, DataLoadError> {
    let csv_err = |source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(open(path)?);

    let headers = reader.headers().map_err(csv_err)?.clone();
    for field in Field::REQUIRED {
        if !headers.iter().any(|h| h == field.column_name()) {
            return Err(DataLoadError::MissingColumn {
                path: path.to_path_buf(),
                column: field,
            });
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = match result {
            Ok(record) => record
                .deserialize::<RawRecord>(Some(&headers))
                .map_err(unreadable_row),
            Err(e) => match e.kind() {
                csv::ErrorKind::UnequalLengths { .. }
                | csv::ErrorKind::Utf8 { .. }
                | csv::ErrorKind::Deserialize { .. } => Err(unreadable_row(e)),
                _ => return Err(csv_err(e)),
            },
        };
        rows.push(row);
    }

    Ok(normalize_rows(path, rows))
}

fn unreadable_row(e: csv::Error) -> MalformedValueError {
    MalformedValueError::UnreadableRow {
        reason: e.to_string(),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "category": "Electronics",
///     "rating": 4.2,
///     "actual_price": 1099,
///     "discounted_price": 399,
///     "discount_percentage": "64%"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<LoadedDataset, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| DataLoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let shape_err = || DataLoadError::JsonShape {
        path: path.to_path_buf(),
    };
    let objects = root
        .as_array()
        .ok_or_else(shape_err)?
        .iter()
        .map(|rec| rec.as_object().ok_or_else(shape_err))
        .collect::<Result<Vec<_>, _>>()?;

    if !objects.is_empty() {
        for field in Field::REQUIRED {
            if !objects.iter().any(|obj| obj.contains_key(field.column_name())) {
                return Err(DataLoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: field,
                });
            }
        }
    }

    let rows = objects.into_iter().map(|obj| Ok(json_to_raw(obj)));
    Ok(normalize_rows(path, rows))
}

fn json_to_raw(obj: &Map<String, JsonValue>) -> RawRecord {
    let mut raw = RawRecord::default();
    for field in Field::REQUIRED.into_iter().chain(Field::OPTIONAL) {
        raw.set(field, obj.get(field.column_name()).and_then(json_cell_text));
    }
    raw
}

fn json_cell_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): text columns may be `Utf8` or
/// `LargeUtf8`, numeric columns any of the common int/float widths.
fn load_parquet(path: &Path) -> Result<LoadedDataset, DataLoadError> {
    let parquet_err = |source| DataLoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?).map_err(parquet_err)?;
    let schema = builder.schema().clone();

    for field in Field::REQUIRED {
        if schema.index_of(field.column_name()).is_err() {
            return Err(DataLoadError::MissingColumn {
                path: path.to_path_buf(),
                column: field,
            });
        }
    }
    let columns: Vec<(Field, usize)> = Field::REQUIRED
        .into_iter()
        .chain(Field::OPTIONAL)
        .filter_map(|f| schema.index_of(f.column_name()).ok().map(|idx| (f, idx)))
        .collect();

    let reader = builder.build().map_err(parquet_err)?;
    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.map_err(|source| DataLoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;

        for row in 0..batch.num_rows() {
            let mut raw = RawRecord::default();
            for (field, idx) in &columns {
                raw.set(*field, cell_text(batch.column(*idx), row));
            }
            rows.push(Ok(raw));
        }
    }

    Ok(normalize_rows(path, rows))
}

// -- Parquet / Arrow helpers --

/// Render one Arrow cell as the text the normalizers expect.
fn cell_text(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row).to_string(),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row).to_string(),
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row).to_string(),
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row).to_string(),
        _ => arrow::util::display::array_value_to_string(col, row).ok()?,
    };
    Some(text)
}
