use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Predictions plot (bottom panel)
// ---------------------------------------------------------------------------

/// Scatter the batch predictions by row index, one series per label of the
/// colouring feature (substance by default) so the legend doubles as a
/// category breakdown.
pub fn predictions_plot(ui: &mut Ui, state: &AppState) {
    let (Some(batch), Some(predictions)) = (&state.batch, &state.predictions) else {
        return;
    };

    let color_idx = state
        .color_feature
        .as_deref()
        .and_then(|name| batch.column_index(name));

    // Group rows by their colouring label.
    let mut series: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for (row, &pred) in predictions.iter().enumerate() {
        let label = color_idx
            .and_then(|idx| batch.get(row, idx))
            .map(ToString::to_string)
            .unwrap_or_else(|| "all rows".to_string());
        series.entry(label).or_default().push([row as f64, pred]);
    }

    Plot::new("predictions_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Row")
        .y_axis_label("Predicted GHG Emission")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (label, coords) in series {
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&label))
                    .unwrap_or(Color32::LIGHT_BLUE);

                let points: PlotPoints = coords.into_iter().collect();
                plot_ui.points(Points::new(points).name(&label).color(color).radius(3.0));
            }
        });
}
