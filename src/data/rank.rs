use std::collections::HashMap;
use std::num::NonZeroUsize;

use serde::Serialize;

use super::model::RecordSet;

/// How many products fall in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

impl CategoryCount {
    pub fn new(category: impl Into<String>, count: usize) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Every category in `records` with its frequency, most frequent first.
///
/// Ties keep first-seen order: of two categories with equal counts, the one
/// whose first record comes earlier in `records` ranks higher.
pub fn category_counts(records: &RecordSet) -> Vec<CategoryCount> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<CategoryCount> = Vec::new();

    for record in records {
        match position.get(record.category.as_str()) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                position.insert(record.category.as_str(), counts.len());
                counts.push(CategoryCount::new(record.category.as_str(), 1));
            }
        }
    }

    // Stable: equal counts stay in first-seen order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// The `n` most frequent categories (fewer if `records` has fewer distinct
/// categories). Same ordering as [`category_counts`].
pub fn top_n(records: &RecordSet, n: NonZeroUsize) -> Vec<CategoryCount> {
    let mut counts = category_counts(records);
    counts.truncate(n.get());
    counts
}
