use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    // ---- Rating range ----
    ui.strong("Rating");
    let mut min = state.min_rating;
    if ui
        .add(egui::Slider::new(&mut min, 0.0..=5.0).step_by(0.1).text("min"))
        .changed()
    {
        state.set_min_rating(min);
    }
    let mut max = state.max_rating;
    if ui
        .add(egui::Slider::new(&mut max, 0.0..=5.0).step_by(0.1).text("max"))
        .changed()
    {
        state.set_max_rating(max);
    }
    ui.separator();

    // ---- Category checklist ----
    let n_selected = state.selected_categories.len();
    let n_total = dataset.categories.len();
    ui.strong(format!("Category  ({n_selected}/{n_total})"));
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all();
        }
        if ui.small_button("None").clicked() {
            state.select_none();
        }
    });
    if state.selected_categories.is_empty() {
        ui.label(RichText::new("Nothing selected: showing all categories").italics());
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for category in &dataset.categories {
                let mut text = RichText::new(category);
                if let Some(cm) = &state.color_map {
                    text = text.color(cm.color_for(category));
                }

                let mut checked = state.selected_categories.contains(category);
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_category(category);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.snapshot.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export views…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let shown = state.snapshot.as_ref().map_or(0, |s| s.filtered.len());
            ui.label(format!("{} products loaded, {} shown", ds.len(), shown));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open product data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if state.open(&path).is_err() {
            if let Some(current) = &state.dataset {
                log::info!("Keeping {}", current.source.display());
            }
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart views")
        .set_file_name("views.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_views(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
