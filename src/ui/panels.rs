use std::path::Path;

use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};

use crate::model::artifacts::{FeatureKind, ModelArtifacts};
use crate::state::{AppState, FieldInput};

// ---------------------------------------------------------------------------
// Left side panel – single prediction form
// ---------------------------------------------------------------------------

/// Render the prediction form.  Widgets are derived from the artifact
/// schema: dropdowns list exactly the fitted label sets and score inputs
/// clamp to [0, 5], so the single-record path cannot produce an invalid
/// feature vector.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Single Prediction");
    ui.separator();

    let Some(artifacts) = state.artifacts.clone() else {
        ui.label("No model loaded.");
        ui.label("Use File → Load model… to pick an artifacts.json bundle.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, spec) in artifacts.schema.iter().enumerate() {
                ui.label(RichText::new(&spec.name).strong());
                match (&mut state.inputs[i], spec.kind) {
                    (FieldInput::Label(selected), FeatureKind::Categorical) => {
                        let classes = artifacts
                            .encoder(&spec.name)
                            .map(|e| e.classes().to_vec())
                            .unwrap_or_default();
                        egui::ComboBox::from_id_salt(&spec.name)
                            .selected_text(selected.as_str())
                            .width(ui.available_width() - 8.0)
                            .show_ui(ui, |ui: &mut Ui| {
                                for class in &classes {
                                    ui.selectable_value(selected, class.clone(), class);
                                }
                            });
                    }
                    (FieldInput::Number(value), _) => {
                        ui.add(DragValue::new(value).speed(0.01));
                    }
                    (FieldInput::Score(value), _) => {
                        ui.add(DragValue::new(value).range(0..=5));
                    }
                    // Form state is rebuilt whenever artifacts load, so the
                    // kinds cannot disagree; render nothing if they do.
                    _ => {}
                }
                ui.add_space(6.0);
            }

            ui.separator();

            if ui.button("Predict Emission").clicked() {
                state.run_single();
            }

            if let Some(value) = state.single_prediction {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("Predicted GHG Emission Factor: {value:.4}"))
                        .color(Color32::from_rgb(0, 160, 60))
                        .strong(),
                );
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
            if ui.button("Load model…").clicked() {
                load_model_dialog(state);
                ui.close_menu();
            }
            let open = ui.add_enabled(
                state.artifacts.is_some(),
                egui::Button::new("Open batch file…"),
            );
            if open.clicked() {
                open_batch_dialog(state);
                ui.close_menu();
            }
            let export = ui.add_enabled(
                state.results.is_some(),
                egui::Button::new("Export results…"),
            );
            if export.clicked() {
                export_results_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        match (&state.artifacts, &state.artifact_path) {
            (Some(artifacts), Some(path)) => {
                ui.label(format!(
                    "Model: {} ({} features)",
                    path.display(),
                    artifacts.schema.len()
                ));
            }
            _ => {
                ui.label("Model: not loaded");
            }
        }

        if let Some(batch) = &state.batch {
            ui.separator();
            match &state.predictions {
                Some(p) => ui.label(format!("{} rows predicted", p.len())),
                None => ui.label(format!("{} rows loaded", batch.len())),
            };
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

/// Load an artifact bundle from an explicit path (startup probe and dialog).
pub fn load_artifacts(state: &mut AppState, path: &Path) {
    match ModelArtifacts::load(path) {
        Ok(artifacts) => {
            log::info!(
                "Loaded model artifacts from {} ({} features)",
                path.display(),
                artifacts.schema.len()
            );
            state.set_artifacts(artifacts, path.to_path_buf());
        }
        Err(e) => {
            log::error!("Failed to load model artifacts: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn load_model_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Load model artifacts")
        .add_filter("Model artifacts", &["json"])
        .pick_file();

    if let Some(path) = file {
        load_artifacts(state, &path);
    }
}

/// Open a batch table and run the whole pipeline over it.  Any failure is
/// reported once in the status line; no partial results are kept.
pub fn open_batch_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open batch input")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(table) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    table.len(),
                    table.columns
                );
                state.set_batch(table);
                state.run_batch();
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn export_results_dialog(state: &mut AppState) {
    let Some(results) = &state.results else {
        return;
    };

    let file = rfd::FileDialog::new()
        .set_title("Export predictions")
        .set_file_name("ghg_predictions.csv")
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match crate::data::export::write_csv(results, &path) {
            Ok(()) => {
                log::info!("Exported {} rows to {}", results.len(), path.display());
            }
            Err(e) => {
                log::error!("Failed to export results: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
