use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::Table;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Batch table grid (central panel)
// ---------------------------------------------------------------------------

/// Render the batch table: results when predictions exist, otherwise a
/// preview of the uploaded file.
pub fn table_panel(ui: &mut Ui, state: &AppState) {
    let table = match (&state.results, &state.batch) {
        (Some(results), _) => results,
        (None, Some(batch)) => batch,
        (None, None) => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a batch file to predict  (File → Open batch file…)");
            });
            return;
        }
    };

    grid(ui, table);
}

fn grid(ui: &mut Ui, table: &Table) {
    let mut builder = TableBuilder::new(ui).striped(true);
    for _ in &table.columns {
        builder = builder.column(Column::auto().resizable(true).at_least(60.0));
    }

    builder
        .header(22.0, |mut header| {
            for name in &table.columns {
                header.col(|ui| {
                    ui.label(RichText::new(name).strong());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.len(), |mut row| {
                let cells = &table.rows[row.index()];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell.to_string());
                    });
                }
            });
        });
}
