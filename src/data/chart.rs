use std::collections::HashSet;
use std::num::NonZeroUsize;

use serde::Serialize;

use super::model::{ProductRecord, RecordSet};
use super::rank::CategoryCount;

/// The scatter views and the bar chart only show this many categories.
pub const TOP_CATEGORY_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(n) => n,
    None => panic!("limit must be non-zero"),
};

/// Bin count suggested for the rating histogram.
pub const RATING_HISTOGRAM_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Axis metadata
// ---------------------------------------------------------------------------

/// How the renderer should scale an axis. Data is never transformed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    Linear,
    Log10,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisHint {
    pub label: &'static str,
    pub scale: AxisScale,
}

impl AxisHint {
    pub const fn linear(label: &'static str) -> Self {
        Self {
            label,
            scale: AxisScale::Linear,
        }
    }

    pub const fn log10(label: &'static str) -> Self {
        Self {
            label,
            scale: AxisScale::Log10,
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter views (price comparison, discount vs rating)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    /// Legend / colour group.
    pub category: String,
}

/// `(x, y, category)` points plus axis hints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterView {
    pub title: &'static str,
    pub x_axis: AxisHint,
    pub y_axis: AxisHint,
    pub points: Vec<ScatterPoint>,
}

impl ScatterView {
    fn from_records<'a>(
        title: &'static str,
        x_axis: AxisHint,
        y_axis: AxisHint,
        records: impl IntoIterator<Item = &'a ProductRecord>,
        xy: impl Fn(&ProductRecord) -> (f64, f64),
    ) -> Self {
        let points = records
            .into_iter()
            .map(|r| {
                let (x, y) = xy(r);
                ScatterPoint {
                    x,
                    y,
                    category: r.category.clone(),
                }
            })
            .collect();
        Self {
            title,
            x_axis,
            y_axis,
            points,
        }
    }

    /// Distinct categories in order of first appearance (legend order).
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.points
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Rating distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Raw ratings of every filtered product plus a bin-count hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingDistributionView {
    pub title: &'static str,
    pub axis: AxisHint,
    pub values: Vec<f64>,
    pub bins: usize,
}

impl RatingDistributionView {
    /// Equal-width bins over `[min, max]` of the values; the last bin is
    /// closed on the right. A single distinct value gets a range of ±0.5
    /// around it.
    pub fn histogram(&self) -> Vec<HistogramBin> {
        if self.values.is_empty() || self.bins == 0 {
            return Vec::new();
        }

        let (mut lo, mut hi) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / self.bins as f64;

        let mut counts = vec![0usize; self.bins];
        for &v in &self.values {
            let idx = (((v - lo) / width) as usize).min(self.bins - 1);
            counts[idx] += 1;
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                start: lo + i as f64 * width,
                end: lo + (i + 1) as f64 * width,
                count,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Top categories
// ---------------------------------------------------------------------------

/// `(category, count)` bars, most frequent first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCategoriesView {
    pub title: &'static str,
    pub count_axis: AxisHint,
    pub category_axis: AxisHint,
    pub entries: Vec<CategoryCount>,
}

impl TopCategoriesView {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ChartViews – everything the renderer draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartViews {
    pub price_comparison: ScatterView,
    pub rating_distribution: RatingDistributionView,
    pub discount_vs_rating: ScatterView,
    pub top_categories: TopCategoriesView,
}

impl ChartViews {
    /// True when there is nothing to draw in any view.
    pub fn is_empty(&self) -> bool {
        self.price_comparison.is_empty()
            && self.rating_distribution.is_empty()
            && self.discount_vs_rating.is_empty()
            && self.top_categories.is_empty()
    }
}

/// Derive the four views from the filtered records and their top categories.
///
/// `top` is used as-is for the bar chart and, as a set, to restrict both
/// scatter views, so the two always agree on which categories they show.
pub fn build_views(filtered: &RecordSet, top: &[CategoryCount]) -> ChartViews {
    let top_set: HashSet<&str> = top.iter().map(|c| c.category.as_str()).collect();
    let in_top: Vec<&ProductRecord> = filtered
        .iter()
        .filter(|r| top_set.contains(r.category.as_str()))
        .collect();

    let price_comparison = ScatterView::from_records(
        "Actual Price vs Discounted Price",
        AxisHint::log10("Actual Price"),
        AxisHint::log10("Discounted Price"),
        in_top.iter().copied(),
        |r| (r.actual_price, r.discounted_price),
    );

    let discount_vs_rating = ScatterView::from_records(
        "Discount Percentage vs Rating",
        AxisHint::linear("Discount Percentage"),
        AxisHint::linear("Rating"),
        in_top.iter().copied(),
        |r| (r.discount_percentage, r.rating),
    );

    let rating_distribution = RatingDistributionView {
        title: "Distribution of Product Ratings",
        axis: AxisHint::linear("Rating"),
        values: filtered.iter().map(|r| r.rating).collect(),
        bins: RATING_HISTOGRAM_BINS,
    };

    let top_categories = TopCategoriesView {
        title: "Top 10 Product Categories by Count",
        count_axis: AxisHint::linear("Number of Products"),
        category_axis: AxisHint::linear("Category"),
        entries: top.to_vec(),
    };

    ChartViews {
        price_comparison,
        rating_distribution,
        discount_vs_rating,
        top_categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::rank::top_n;

    fn record(category: &str, rating: f64, price: f64) -> ProductRecord {
        ProductRecord {
            product_id: None,
            product_name: None,
            category: category.to_string(),
            rating,
            actual_price: price,
            discounted_price: price / 2.0,
            discount_percentage: 50.0,
        }
    }

    /// Eleven categories; "k" is the rarest and falls outside the top 10.
    fn eleven_categories() -> RecordSet {
        let mut records = Vec::new();
        for (i, cat) in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]
            .iter()
            .enumerate()
        {
            records.push(record(cat, 4.0, 10.0 * (i + 1) as f64));
            records.push(record(cat, 3.0, 1000.0));
        }
        records.push(record("k", 1.0, 5.0));
        RecordSet::new(records)
    }

    #[test]
    fn scatter_views_share_the_top_category_set() {
        let filtered = eleven_categories();
        let top = top_n(&filtered, TOP_CATEGORY_LIMIT);
        let views = build_views(&filtered, &top);

        assert_eq!(views.price_comparison.points.len(), 20);
        assert_eq!(views.discount_vs_rating.points.len(), 20);
        assert!(views.price_comparison.points.iter().all(|p| p.category != "k"));
        assert_eq!(
            views.price_comparison.categories(),
            views.discount_vs_rating.categories()
        );
    }

    #[test]
    fn rating_distribution_covers_every_filtered_record() {
        let filtered = eleven_categories();
        let top = top_n(&filtered, TOP_CATEGORY_LIMIT);
        let views = build_views(&filtered, &top);

        assert_eq!(views.rating_distribution.values.len(), 21);
        assert_eq!(views.rating_distribution.bins, 20);
        assert!(views.rating_distribution.values.contains(&1.0));
    }

    #[test]
    fn price_axes_carry_a_log_hint_without_touching_data() {
        let filtered = RecordSet::new(vec![record("a", 4.0, 1000.0)]);
        let top = top_n(&filtered, TOP_CATEGORY_LIMIT);
        let view = build_views(&filtered, &top).price_comparison;

        assert_eq!(view.x_axis.scale, AxisScale::Log10);
        assert_eq!(view.y_axis.scale, AxisScale::Log10);
        assert_eq!(view.points[0].x, 1000.0);
        assert_eq!(view.points[0].y, 500.0);
    }

    #[test]
    fn discount_view_plots_discount_against_rating() {
        let filtered = RecordSet::new(vec![record("a", 3.5, 10.0)]);
        let top = top_n(&filtered, TOP_CATEGORY_LIMIT);
        let view = build_views(&filtered, &top).discount_vs_rating;

        assert_eq!(view.x_axis.scale, AxisScale::Linear);
        assert_eq!((view.points[0].x, view.points[0].y), (50.0, 3.5));
    }

    #[test]
    fn top_categories_view_is_the_ranking() {
        let filtered = eleven_categories();
        let top = top_n(&filtered, TOP_CATEGORY_LIMIT);
        let views = build_views(&filtered, &top);
        assert_eq!(views.top_categories.entries, top);
        assert_eq!(views.top_categories.entries.len(), 10);
    }

    #[test]
    fn empty_input_gives_empty_views() {
        let views = build_views(&RecordSet::default(), &[]);
        assert!(views.is_empty());
        assert!(views.rating_distribution.histogram().is_empty());
    }

    #[test]
    fn histogram_counts_sum_to_values() {
        let view = RatingDistributionView {
            title: "",
            axis: AxisHint::linear("Rating"),
            values: vec![1.0, 2.0, 2.5, 3.0, 4.9, 5.0, 5.0],
            bins: RATING_HISTOGRAM_BINS,
        };
        let bins = view.histogram();
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 7);
        assert_eq!(bins[0].start, 1.0);
        assert_eq!(bins[0].count, 1);
        assert_eq!(bins[19].count, 3);
        assert!((bins[19].end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_of_a_single_value_is_centered() {
        let view = RatingDistributionView {
            title: "",
            axis: AxisHint::linear("Rating"),
            values: vec![4.0, 4.0],
            bins: 20,
        };
        let bins = view.histogram();
        assert_eq!(bins[0].start, 3.5);
        let filled: Vec<&HistogramBin> = bins.iter().filter(|b| b.count > 0).collect();
        assert_eq!(filled.len(), 1);
        assert_eq!(filled[0].count, 2);
        assert!(filled[0].start <= 4.0 && 4.0 <= filled[0].end);
    }
}
