use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table_view};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct GhgPredictorApp {
    pub state: AppState,
}

impl eframe::App for GhgPredictorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: single prediction form ----
        egui::SidePanel::left("form_panel")
            .default_width(320.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: predictions plot (after a batch run) ----
        if self.state.predictions.is_some() {
            egui::TopBottomPanel::bottom("plot_panel")
                .default_height(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    plot::predictions_plot(ui, &self.state);
                });
        }

        // ---- Central panel: batch table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table_view::table_panel(ui, &self.state);
        });
    }
}
