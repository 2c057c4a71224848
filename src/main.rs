mod app;
mod color;
mod config;
mod state;
mod ui;

use anyhow::anyhow;
use app::ProductDashboardApp;
use clap::Parser;
use config::Cli;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut state = AppState::new(cli.initial_range()?);
    match cli.dataset_path() {
        // A load failure is shown in the status line; the window still opens.
        Some(path) => {
            if state.open(&path).is_err() {
                log::warn!("Starting without a dataset");
            }
        }
        None => log::info!("No dataset given; use File → Open…"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Product Analysis Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(ProductDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("failed to start the dashboard: {e}"))
}
