use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::error::MalformedValueError;

// ---------------------------------------------------------------------------
// Field – the columns the loader understands
// ---------------------------------------------------------------------------

/// A named column of the product table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ProductId,
    ProductName,
    Category,
    Rating,
    ActualPrice,
    DiscountedPrice,
    DiscountPercentage,
}

impl Field {
    /// Columns a source must provide; a missing one fails the whole load.
    pub const REQUIRED: [Field; 5] = [
        Field::Category,
        Field::Rating,
        Field::ActualPrice,
        Field::DiscountedPrice,
        Field::DiscountPercentage,
    ];

    /// Columns carried through when present.
    pub const OPTIONAL: [Field; 2] = [Field::ProductId, Field::ProductName];

    /// Header / key name in the source file.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::ProductId => "product_id",
            Field::ProductName => "product_name",
            Field::Category => "category",
            Field::Rating => "rating",
            Field::ActualPrice => "actual_price",
            Field::DiscountedPrice => "discounted_price",
            Field::DiscountPercentage => "discount_percentage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Normalization of raw cells
// ---------------------------------------------------------------------------

pub const MAX_RATING: f64 = 5.0;
pub const MAX_DISCOUNT: f64 = 100.0;

const CURRENCY_SYMBOLS: [char; 4] = ['₹', '$', '€', '£'];

fn parse_number(field: Field, raw: &str) -> Result<f64, MalformedValueError> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(MalformedValueError::NotANumber {
            field,
            value: raw.to_string(),
        }),
    }
}

/// `"20%"` → `20.0`. A value without the trailing `%` is rejected, as is
/// anything outside `[0, 100]`.
pub fn normalize_discount(raw: &str) -> Result<f64, MalformedValueError> {
    let trimmed = raw.trim();
    let Some(number) = trimmed.strip_suffix('%') else {
        return Err(MalformedValueError::MissingPercentSign {
            value: trimmed.to_string(),
        });
    };
    let value = parse_number(Field::DiscountPercentage, number.trim())?;
    if !(0.0..=MAX_DISCOUNT).contains(&value) {
        return Err(MalformedValueError::OutOfRange {
            field: Field::DiscountPercentage,
            value,
        });
    }
    Ok(value)
}

/// Star rating in `[0, 5]`.
pub fn normalize_rating(raw: &str) -> Result<f64, MalformedValueError> {
    let value = parse_number(Field::Rating, raw.trim())?;
    if !(0.0..=MAX_RATING).contains(&value) {
        return Err(MalformedValueError::OutOfRange {
            field: Field::Rating,
            value,
        });
    }
    Ok(value)
}

/// Positive currency amount. Tolerates a leading currency symbol and
/// thousands separators (`"₹1,099"` → `1099.0`).
pub fn normalize_price(field: Field, raw: &str) -> Result<f64, MalformedValueError> {
    let trimmed = raw.trim();
    let unprefixed = trimmed.trim_start_matches(&CURRENCY_SYMBOLS[..]).trim_start();
    let digits: String = unprefixed.chars().filter(|c| *c != ',').collect();
    let value = parse_number(field, &digits).map_err(|_| MalformedValueError::NotANumber {
        field,
        value: trimmed.to_string(),
    })?;
    if value <= 0.0 {
        return Err(MalformedValueError::OutOfRange { field, value });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// RawRecord – one row as text, before normalization
// ---------------------------------------------------------------------------

/// Cells of one source row, exactly as read. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub rating: Option<String>,
    pub actual_price: Option<String>,
    pub discounted_price: Option<String>,
    pub discount_percentage: Option<String>,
}

impl RawRecord {
    /// Store a cell under its column.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        let slot = match field {
            Field::ProductId => &mut self.product_id,
            Field::ProductName => &mut self.product_name,
            Field::Category => &mut self.category,
            Field::Rating => &mut self.rating,
            Field::ActualPrice => &mut self.actual_price,
            Field::DiscountedPrice => &mut self.discounted_price,
            Field::DiscountPercentage => &mut self.discount_percentage,
        };
        *slot = value;
    }

    /// Convert into a canonical record. This is the only place the
    /// percent-string form of the discount exists.
    pub fn normalize(&self) -> Result<ProductRecord, MalformedValueError> {
        fn required(field: Field, cell: &Option<String>) -> Result<&str, MalformedValueError> {
            cell.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .ok_or(MalformedValueError::Missing { field })
        }
        fn optional(cell: &Option<String>) -> Option<String> {
            cell.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        }

        Ok(ProductRecord {
            product_id: optional(&self.product_id),
            product_name: optional(&self.product_name),
            category: required(Field::Category, &self.category)?.to_string(),
            rating: normalize_rating(required(Field::Rating, &self.rating)?)?,
            actual_price: normalize_price(
                Field::ActualPrice,
                required(Field::ActualPrice, &self.actual_price)?,
            )?,
            discounted_price: normalize_price(
                Field::DiscountedPrice,
                required(Field::DiscountedPrice, &self.discounted_price)?,
            )?,
            discount_percentage: normalize_discount(required(
                Field::DiscountPercentage,
                &self.discount_percentage,
            )?)?,
        })
    }
}

// ---------------------------------------------------------------------------
// ProductRecord – one normalized row
// ---------------------------------------------------------------------------

/// A single product listing with every numeric field already parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub product_id: Option<String>,
    pub product_name: Option<String>,
    /// Grouping key.
    pub category: String,
    /// `[0, 5]`.
    pub rating: f64,
    pub actual_price: f64,
    pub discounted_price: f64,
    /// `[0, 100]`, percent sign already stripped.
    pub discount_percentage: f64,
}

// ---------------------------------------------------------------------------
// RecordSet – ordered rows in load order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<ProductRecord>,
}

impl RecordSet {
    pub fn new(records: Vec<ProductRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Sorted distinct categories.
    pub fn categories(&self) -> BTreeSet<String> {
        self.records.iter().map(|r| r.category.clone()).collect()
    }
}

impl From<Vec<ProductRecord>> for RecordSet {
    fn from(records: Vec<ProductRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<ProductRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a ProductRecord;
    type IntoIter = std::slice::Iter<'a, ProductRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ---------------------------------------------------------------------------
// LoadedDataset – the complete normalized dataset
// ---------------------------------------------------------------------------

/// A row the loader rejected. `row` is 1-based over data rows (header excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRecord {
    pub row: usize,
    pub error: MalformedValueError,
}

/// The normalized dataset plus the bookkeeping the UI needs.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    /// Where the rows came from.
    pub source: PathBuf,
    /// Rows that passed normalization, in file order.
    pub records: RecordSet,
    /// Sorted distinct categories (filter widget options).
    pub categories: Vec<String>,
    /// Rows that failed normalization.
    pub dropped: Vec<DroppedRecord>,
}

impl LoadedDataset {
    /// Build the category index from the loaded records.
    pub fn new(source: PathBuf, records: RecordSet, dropped: Vec<DroppedRecord>) -> Self {
        let categories = records.categories().into_iter().collect();
        LoadedDataset {
            source,
            records,
            categories,
            dropped,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}
