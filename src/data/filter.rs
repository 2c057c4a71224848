use std::collections::BTreeSet;

use serde::Serialize;

use super::error::FilterSpecError;
use super::model::{ProductRecord, RecordSet, MAX_RATING};

// ---------------------------------------------------------------------------
// RatingRange – inclusive [min, max] within [0, 5]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingRange {
    min: f64,
    max: f64,
}

impl RatingRange {
    /// Both bounds must lie in `[0, 5]` and `min <= max`. Inverted bounds are
    /// an error, never swapped.
    pub fn new(min: f64, max: f64) -> Result<Self, FilterSpecError> {
        for value in [min, max] {
            if !(0.0..=MAX_RATING).contains(&value) {
                return Err(FilterSpecError::BoundOutOfRange { value });
            }
        }
        if min > max {
            return Err(FilterSpecError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// The whole rating scale.
    pub fn full() -> Self {
        Self {
            min: 0.0,
            max: MAX_RATING,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, rating: f64) -> bool {
        self.min <= rating && rating <= self.max
    }
}

impl Default for RatingRange {
    /// 3 to 5 stars, the range the dashboard opens with.
    fn default() -> Self {
        Self { min: 3.0, max: 5.0 }
    }
}

// ---------------------------------------------------------------------------
// FilterSpec – one user interaction's worth of filter state
// ---------------------------------------------------------------------------

/// Rating range plus selected categories.
///
/// An empty category set means "no category filter": every category passes.
/// It does **not** mean "hide everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterSpec {
    rating_range: RatingRange,
    categories: BTreeSet<String>,
}

impl FilterSpec {
    pub fn new(rating_range: RatingRange, categories: BTreeSet<String>) -> Self {
        Self {
            rating_range,
            categories,
        }
    }

    /// Validate raw slider values and build a spec in one step.
    pub fn from_bounds(
        min: f64,
        max: f64,
        categories: impl IntoIterator<Item = String>,
    ) -> Result<Self, FilterSpecError> {
        Ok(Self::new(
            RatingRange::new(min, max)?,
            categories.into_iter().collect(),
        ))
    }

    pub fn rating_range(&self) -> RatingRange {
        self.rating_range
    }

    pub fn categories(&self) -> &BTreeSet<String> {
        &self.categories
    }

    /// Whether a single record passes both predicates.
    pub fn matches(&self, record: &ProductRecord) -> bool {
        self.rating_range.contains(record.rating)
            && (self.categories.is_empty() || self.categories.contains(&record.category))
    }
}

// ---------------------------------------------------------------------------
// apply – produce the filtered view
// ---------------------------------------------------------------------------

/// Records passing `spec`, in input order. The input is left untouched; no
/// match is an empty set, not an error.
pub fn apply(records: &RecordSet, spec: &FilterSpec) -> RecordSet {
    records.iter().filter(|r| spec.matches(r)).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, rating: f64) -> ProductRecord {
        ProductRecord {
            product_id: None,
            product_name: None,
            category: category.to_string(),
            rating,
            actual_price: 100.0,
            discounted_price: 80.0,
            discount_percentage: 20.0,
        }
    }

    fn sample() -> RecordSet {
        RecordSet::new(vec![
            record("A", 4.5),
            record("B", 2.0),
            record("A", 3.0),
            record("C", 5.0),
            record("B", 3.7),
        ])
    }

    #[test]
    fn inverted_range_is_rejected_not_swapped() {
        assert_eq!(
            RatingRange::new(4.0, 3.0),
            Err(FilterSpecError::Inverted { min: 4.0, max: 3.0 })
        );
        assert!(FilterSpec::from_bounds(5.0, 0.0, Vec::new()).is_err());
    }

    #[test]
    fn bounds_outside_scale_are_rejected() {
        assert!(matches!(
            RatingRange::new(-0.1, 3.0),
            Err(FilterSpecError::BoundOutOfRange { .. })
        ));
        assert!(RatingRange::new(0.0, 5.5).is_err());
        assert!(RatingRange::new(f64::NAN, 5.0).is_err());
        assert!(RatingRange::new(2.5, 2.5).is_ok());
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        let spec = FilterSpec::from_bounds(3.0, 4.5, Vec::new()).unwrap();
        let out = apply(&sample(), &spec);
        let ratings: Vec<f64> = out.iter().map(|r| r.rating).collect();
        assert_eq!(ratings, vec![4.5, 3.0, 3.7]);
    }

    #[test]
    fn empty_category_set_means_no_category_filter() {
        let records = sample();
        let range = RatingRange::full();
        let with_empty = apply(&records, &FilterSpec::new(range, BTreeSet::new()));
        let rating_only: RecordSet = records
            .iter()
            .filter(|r| range.contains(r.rating))
            .cloned()
            .collect();
        assert_eq!(with_empty, rating_only);
        assert_eq!(with_empty, records);
    }

    #[test]
    fn category_membership_is_applied_when_non_empty() {
        let spec = FilterSpec::from_bounds(0.0, 5.0, vec!["B".to_string()]).unwrap();
        let out = apply(&sample(), &spec);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|r| r.category == "B"));
    }

    #[test]
    fn unknown_category_yields_empty_set() {
        let spec = FilterSpec::from_bounds(0.0, 5.0, vec!["X".to_string()]).unwrap();
        assert!(apply(&sample(), &spec).is_empty());
    }

    #[test]
    fn apply_is_an_idempotent_subset() {
        let records = sample();
        let spec = FilterSpec::from_bounds(3.0, 5.0, vec!["A".into(), "C".into()]).unwrap();
        let once = apply(&records, &spec);
        let twice = apply(&once, &spec);
        assert_eq!(once, twice);
        assert!(once.iter().all(|r| records.iter().any(|orig| orig == r)));
        assert_eq!(records.len(), 5);
    }
}
