use std::collections::BTreeMap;

use crate::data::table::{CellValue, Table};

use super::artifacts::{FeatureKind, ModelArtifacts};
use super::error::PipelineError;

/// Name of the column appended to batch output.
pub const PREDICTION_COLUMN: &str = "Predicted GHG Emission";

/// One unassembled record: feature name → raw value.
pub type RawRecord = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Row assembly
// ---------------------------------------------------------------------------

/// Order raw field values into the training-time column sequence, encoding
/// categorical labels along the way.
///
/// The schema in `artifacts` is the only source of column order; callers
/// never index features positionally.
pub fn assemble_row(
    artifacts: &ModelArtifacts,
    record: &RawRecord,
) -> Result<Vec<f64>, PipelineError> {
    let missing: Vec<String> = artifacts
        .schema
        .iter()
        .filter(|spec| !record.contains_key(&spec.name))
        .map(|spec| spec.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    artifacts
        .schema
        .iter()
        .map(|spec| feature_value(artifacts, &spec.name, spec.kind, &record[&spec.name]))
        .collect()
}

/// Interpret one raw cell according to its feature kind.
fn feature_value(
    artifacts: &ModelArtifacts,
    name: &str,
    kind: FeatureKind,
    cell: &CellValue,
) -> Result<f64, PipelineError> {
    match kind {
        FeatureKind::Categorical => {
            // Anything that is not a known label is an unknown category,
            // including non-string cells.
            let label = match cell.as_str() {
                Some(s) => s.to_string(),
                None => cell.to_string(),
            };
            let encoder = artifacts
                .encoder(name)
                .ok_or_else(|| PipelineError::UnknownCategory {
                    feature: name.to_string(),
                    label: label.clone(),
                })?;
            let code = encoder
                .encode(&label)
                .ok_or_else(|| PipelineError::UnknownCategory {
                    feature: name.to_string(),
                    label,
                })?;
            Ok(code as f64)
        }
        FeatureKind::Numeric | FeatureKind::Score => {
            cell.as_f64().ok_or_else(|| PipelineError::NonNumeric {
                column: name.to_string(),
                value: cell.to_string(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Single-record pipeline
// ---------------------------------------------------------------------------

/// Run one record through assemble → encode → scale → predict.
///
/// Deterministic: fixed artifacts and a fixed record always produce the
/// same value.
pub fn predict_single(
    artifacts: &ModelArtifacts,
    record: &RawRecord,
) -> Result<f64, PipelineError> {
    let row = assemble_row(artifacts, record)?;
    let scaled = artifacts.scaler.transform(&row)?;
    artifacts.model.predict(&scaled)
}

// ---------------------------------------------------------------------------
// Batch pipeline
// ---------------------------------------------------------------------------

/// Predict every row of an uploaded table.
///
/// All-or-nothing: required columns are checked by exact name before any
/// work happens, and the first row-level failure (unknown label, non-numeric
/// cell) aborts the whole batch with no partial output.  Extra columns are
/// ignored here and preserved by [`augmented_table`].
pub fn predict_batch(
    artifacts: &ModelArtifacts,
    table: &Table,
) -> Result<Vec<f64>, PipelineError> {
    let mut missing = Vec::new();
    let mut indices = Vec::with_capacity(artifacts.schema.len());
    for spec in &artifacts.schema {
        match table.column_index(&spec.name) {
            Some(idx) => indices.push(idx),
            None => missing.push(spec.name.clone()),
        }
    }
    if !missing.is_empty() {
        return Err(PipelineError::MissingColumns(missing));
    }

    let mut predictions = Vec::with_capacity(table.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let assembled: Vec<f64> = artifacts
            .schema
            .iter()
            .zip(&indices)
            .map(|(spec, &idx)| feature_value(artifacts, &spec.name, spec.kind, &row[idx]))
            .collect::<Result<_, _>>()
            .map_err(|e| e.at_row(row_no))?;

        let scaled = artifacts
            .scaler
            .transform(&assembled)
            .map_err(|e| e.at_row(row_no))?;
        let value = artifacts
            .model
            .predict(&scaled)
            .map_err(|e| e.at_row(row_no))?;
        predictions.push(value);
    }

    Ok(predictions)
}

/// Copy the input table and append the prediction column on the right.
pub fn augmented_table(table: &Table, predictions: &[f64]) -> Table {
    let mut out = table.clone();
    out.push_column(
        PREDICTION_COLUMN,
        predictions.iter().map(|&p| CellValue::Float(p)).collect(),
    );
    out
}
