use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ProductDashboardApp {
    pub state: AppState,
}

impl ProductDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for ProductDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let (Some(dataset), Some(snapshot)) = (&state.dataset, &state.snapshot) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a product dataset  (File → Open…)");
        });
        return;
    };

    let colors = state.color_map.as_ref();
    let views = &snapshot.views;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Product Analysis Dashboard");
            ui.label(format!(
                "Showing {} products based on your filters",
                snapshot.filtered.len()
            ));
            if dataset.dropped_count() > 0 {
                ui.label(format!(
                    "{} malformed row(s) were skipped while loading {}",
                    dataset.dropped_count(),
                    dataset.source.display()
                ));
            }

            egui::CollapsingHeader::new("Products")
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    table::products_table(ui, &snapshot.filtered);
                });
            ui.separator();

            plot::scatter_plot(ui, "price_comparison", &views.price_comparison, colors);
            ui.separator();
            plot::rating_histogram(ui, &views.rating_distribution);
            ui.separator();
            plot::scatter_plot(ui, "discount_vs_rating", &views.discount_vs_rating, colors);
            ui.separator();
            plot::top_categories_chart(ui, &views.top_categories, colors);
        });
}
