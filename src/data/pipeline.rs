use super::chart::{build_views, ChartViews, TOP_CATEGORY_LIMIT};
use super::filter::{apply, FilterSpec};
use super::model::RecordSet;
use super::rank::{top_n, CategoryCount};

/// Everything one render cycle needs, derived from a single filter request.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub filtered: RecordSet,
    /// Computed once on `filtered` and shared by every view.
    pub top_categories: Vec<CategoryCount>,
    pub views: ChartViews,
}

/// Filter → rank → views. Pure: the same inputs always give the same
/// snapshot, so hosts can call it on every input change.
pub fn run(records: &RecordSet, spec: &FilterSpec) -> DashboardSnapshot {
    let filtered = apply(records, spec);
    let top_categories = top_n(&filtered, TOP_CATEGORY_LIMIT);
    let views = build_views(&filtered, &top_categories);

    log::debug!(
        "pipeline: {} of {} products pass, {} top categories",
        filtered.len(),
        records.len(),
        top_categories.len()
    );

    DashboardSnapshot {
        filtered,
        top_categories,
        views,
    }
}
