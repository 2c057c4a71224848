use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};
use product_dashboard::data::chart::{
    AxisScale, RatingDistributionView, ScatterView, TopCategoriesView,
};

use crate::color::ColorMap;

const PLOT_HEIGHT: f32 = 320.0;
const POINT_ALPHA: f32 = 0.6;

// ---------------------------------------------------------------------------
// Scatter plots (price comparison, discount vs rating)
// ---------------------------------------------------------------------------

/// Map a data value onto the plot axis. Log axes are drawn by plotting
/// `log10(v)` and labelling ticks with the original magnitude.
fn to_axis(value: f64, scale: AxisScale) -> f64 {
    match scale {
        AxisScale::Linear => value,
        AxisScale::Log10 => value.log10(),
    }
}

fn log_tick_label(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    let value = 10f64.powf(mark.value);
    if value >= 1.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// One colour-coded point series per category, legend outside the data.
pub fn scatter_plot(ui: &mut Ui, id: &str, view: &ScatterView, colors: Option<&ColorMap>) {
    ui.heading(view.title);
    if view.is_empty() {
        ui.label("No products match the current filters.");
        return;
    }

    let (x_scale, y_scale) = (view.x_axis.scale, view.y_axis.scale);
    let mut plot = Plot::new(id)
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(view.x_axis.label)
        .y_axis_label(view.y_axis.label);
    if x_scale == AxisScale::Log10 {
        plot = plot.x_axis_formatter(log_tick_label);
    }
    if y_scale == AxisScale::Log10 {
        plot = plot.y_axis_formatter(log_tick_label);
    }

    plot.show(ui, |plot_ui| {
        for category in view.categories() {
            let points: PlotPoints = view
                .points
                .iter()
                .filter(|p| p.category == category)
                .map(|p| [to_axis(p.x, x_scale), to_axis(p.y, y_scale)])
                .collect();

            let color = colors
                .map(|cm| cm.color_for(category))
                .unwrap_or(Color32::LIGHT_BLUE)
                .gamma_multiply(POINT_ALPHA);

            plot_ui.points(Points::new(points).name(category).color(color).radius(3.0));
        }
    });
}

// ---------------------------------------------------------------------------
// Rating histogram
// ---------------------------------------------------------------------------

pub fn rating_histogram(ui: &mut Ui, view: &RatingDistributionView) {
    ui.heading(view.title);
    let bins = view.histogram();
    if bins.is_empty() {
        ui.label("No products match the current filters.");
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new((b.start + b.end) / 2.0, b.count as f64)
                .width(b.end - b.start)
                .name(format!("{:.2} – {:.2}", b.start, b.end))
        })
        .collect();

    Plot::new("rating_histogram")
        .height(PLOT_HEIGHT)
        .x_axis_label(view.axis.label)
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(Color32::from_rgb(46, 139, 87))
                    .name("Ratings"),
            );
        });
}

// ---------------------------------------------------------------------------
// Top categories bar chart
// ---------------------------------------------------------------------------

/// Horizontal bars, most frequent category at the top.
pub fn top_categories_chart(ui: &mut Ui, view: &TopCategoriesView, colors: Option<&ColorMap>) {
    ui.heading(view.title);
    if view.is_empty() {
        ui.label("No products match the current filters.");
        return;
    }

    let n = view.entries.len();
    let bars: Vec<Bar> = view
        .entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let fill = colors
                .map(|cm| cm.color_for(&entry.category))
                .unwrap_or(Color32::LIGHT_BLUE);
            Bar::new((n - i) as f64, entry.count as f64)
                .name(&entry.category)
                .fill(fill)
                .width(0.7)
        })
        .collect();

    // Bar i sits at y = n - i; label those ticks with the category name.
    let labels: Vec<String> = view.entries.iter().map(|e| e.category.clone()).collect();
    let category_tick = move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let y = mark.value;
        if y.fract() != 0.0 || y < 1.0 || y > n as f64 {
            return String::new();
        }
        labels[n - y as usize].clone()
    };

    Plot::new("top_categories")
        .height(PLOT_HEIGHT)
        .x_axis_label(view.count_axis.label)
        .y_axis_label(view.category_axis.label)
        .y_axis_formatter(category_tick)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name("Products"));
        });
}
