mod app;
mod color;
mod data;
mod model;
mod state;
mod ui;

use std::path::Path;

use app::GhgPredictorApp;
use eframe::egui;

/// Bundle probed at startup; File → Load model… works regardless.
const DEFAULT_ARTIFACTS: &str = "models/artifacts.json";

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "GHG Emission Predictor",
        options,
        Box::new(|_cc| {
            let mut app = GhgPredictorApp::default();
            let default_path = Path::new(DEFAULT_ARTIFACTS);
            if default_path.exists() {
                ui::panels::load_artifacts(&mut app.state, default_path);
            } else {
                log::info!("No bundle at {DEFAULT_ARTIFACTS}; waiting for File → Load model…");
            }
            Ok(Box::new(app))
        }),
    )
}
