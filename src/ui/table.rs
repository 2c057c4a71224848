use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};
use product_dashboard::data::model::RecordSet;

const HEADERS: [&str; 7] = [
    "Product ID",
    "Product",
    "Category",
    "Rating",
    "Actual Price",
    "Discounted Price",
    "Discount %",
];

/// Scrollable table of the filtered products.
pub fn products_table(ui: &mut Ui, records: &RecordSet) {
    let rows = records.as_slice();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(260.0)
        .column(Column::auto())
        .column(Column::initial(260.0).clip(true))
        .column(Column::initial(180.0).clip(true))
        .columns(Column::auto(), 4)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let r = &rows[row.index()];
                row.col(|ui| {
                    ui.label(r.product_id.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(r.product_name.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(r.category.as_str());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", r.rating));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.actual_price));
                });
                row.col(|ui| {
                    ui.label(format!("{:.2}", r.discounted_price));
                });
                row.col(|ui| {
                    ui.label(format!("{:.0}%", r.discount_percentage));
                });
            });
        });
}
