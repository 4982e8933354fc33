use std::path::PathBuf;

use crate::color::ColorMap;
use crate::data::table::{CellValue, Table};
use crate::model::artifacts::{FeatureKind, ModelArtifacts};
use crate::model::pipeline::{self, RawRecord};

// ---------------------------------------------------------------------------
// Form field state
// ---------------------------------------------------------------------------

/// Editable value for one feature of the single-prediction form, parallel to
/// the artifact schema.  Widget choice follows the kind: labels come from the
/// fitted encoder (so unknown categories cannot be typed in), scores are
/// clamped to [0, 5].
#[derive(Debug, Clone)]
pub enum FieldInput {
    Label(String),
    Number(f64),
    Score(u8),
}

impl FieldInput {
    fn to_cell(&self) -> CellValue {
        match self {
            FieldInput::Label(s) => CellValue::String(s.clone()),
            FieldInput::Number(v) => CellValue::Float(*v),
            FieldInput::Score(s) => CellValue::Integer(i64::from(*s)),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded artifact bundle (None until a bundle loads successfully).
    pub artifacts: Option<ModelArtifacts>,

    /// Where the bundle came from, for the top bar.
    pub artifact_path: Option<PathBuf>,

    /// Form values, one per schema feature, in schema order.
    pub inputs: Vec<FieldInput>,

    /// Result of the last single prediction.
    pub single_prediction: Option<f64>,

    /// Uploaded batch table (None until the user opens a file).
    pub batch: Option<Table>,

    /// Batch predictions, one per row of `batch`.
    pub predictions: Option<Vec<f64>>,

    /// `batch` with the prediction column appended, ready for export.
    pub results: Option<Table>,

    /// Which categorical feature colours the predictions plot.
    pub color_feature: Option<String>,

    /// Label → colour for `color_feature`.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            artifacts: None,
            artifact_path: None,
            inputs: Vec::new(),
            single_prediction: None,
            batch: None,
            predictions: None,
            results: None,
            color_feature: None,
            color_map: None,
            status_message: None,
        }
    }
}

impl AppState {
    /// Ingest a validated artifact bundle: reset the form to defaults and
    /// build the plot colour map from the first categorical feature.
    pub fn set_artifacts(&mut self, artifacts: ModelArtifacts, path: PathBuf) {
        self.inputs = artifacts
            .schema
            .iter()
            .map(|spec| match spec.kind {
                FeatureKind::Categorical => {
                    let first = artifacts
                        .encoder(&spec.name)
                        .and_then(|e| e.classes().first().cloned())
                        .unwrap_or_default();
                    FieldInput::Label(first)
                }
                FeatureKind::Numeric => FieldInput::Number(0.0),
                FeatureKind::Score => FieldInput::Score(0),
            })
            .collect();

        self.color_feature = artifacts
            .schema
            .iter()
            .find(|spec| spec.kind == FeatureKind::Categorical)
            .map(|spec| spec.name.clone());
        self.color_map = self.color_feature.as_ref().and_then(|name| {
            artifacts
                .encoder(name)
                .map(|e| ColorMap::new(e.classes()))
        });

        self.artifacts = Some(artifacts);
        self.artifact_path = Some(path);
        self.single_prediction = None;
        self.predictions = None;
        self.results = None;
        self.status_message = None;
    }

    /// Ingest a newly loaded batch table, dropping stale results.
    pub fn set_batch(&mut self, table: Table) {
        self.batch = Some(table);
        self.predictions = None;
        self.results = None;
        self.status_message = None;
    }

    /// The current form as an unassembled record.
    fn form_record(&self) -> Option<RawRecord> {
        let artifacts = self.artifacts.as_ref()?;
        Some(
            artifacts
                .feature_names()
                .zip(&self.inputs)
                .map(|(name, input)| (name.to_string(), input.to_cell()))
                .collect(),
        )
    }

    /// Run the single-record pipeline on the form values.
    pub fn run_single(&mut self) {
        let Some(artifacts) = &self.artifacts else {
            return;
        };
        let Some(record) = self.form_record() else {
            return;
        };
        match pipeline::predict_single(artifacts, &record) {
            Ok(value) => {
                self.single_prediction = Some(value);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Single prediction failed: {e}");
                self.single_prediction = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Run the batch pipeline over the loaded table.  All-or-nothing: on any
    /// failure no results are kept.
    pub fn run_batch(&mut self) {
        let (Some(artifacts), Some(batch)) = (&self.artifacts, &self.batch) else {
            return;
        };
        match pipeline::predict_batch(artifacts, batch) {
            Ok(predictions) => {
                log::info!("Predicted {} rows", predictions.len());
                self.results = Some(pipeline::augmented_table(batch, &predictions));
                self.predictions = Some(predictions);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Batch prediction failed: {e}");
                self.predictions = None;
                self.results = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifacts::{FeatureSpec, LabelEncoder, LinearModel, StandardScaler};
    use std::collections::BTreeMap;

    fn bundle() -> ModelArtifacts {
        let schema = vec![
            FeatureSpec::new("Substance", FeatureKind::Categorical),
            FeatureSpec::new("Margins", FeatureKind::Numeric),
            FeatureSpec::new("DQ Reliability", FeatureKind::Score),
        ];
        let mut encoders = BTreeMap::new();
        encoders.insert(
            "Substance".to_string(),
            LabelEncoder::new(vec!["carbon dioxide", "methane"]),
        );
        ModelArtifacts::new(
            schema,
            encoders,
            StandardScaler::new(vec![0.0; 3], vec![1.0; 3]),
            LinearModel::new(vec![1.0; 3], 0.0),
        )
    }

    #[test]
    fn set_artifacts_builds_default_form_from_schema() {
        let mut state = AppState::default();
        state.set_artifacts(bundle(), PathBuf::from("artifacts.json"));
        assert_eq!(state.inputs.len(), 3);
        assert!(matches!(&state.inputs[0], FieldInput::Label(l) if l == "carbon dioxide"));
        assert!(matches!(state.inputs[1], FieldInput::Number(v) if v == 0.0));
        assert!(matches!(state.inputs[2], FieldInput::Score(0)));
        assert_eq!(state.color_feature.as_deref(), Some("Substance"));
    }

    #[test]
    fn run_single_predicts_from_form_values() {
        let mut state = AppState::default();
        state.set_artifacts(bundle(), PathBuf::from("artifacts.json"));
        state.inputs[0] = FieldInput::Label("methane".into());
        state.inputs[1] = FieldInput::Number(0.5);
        state.inputs[2] = FieldInput::Score(4);
        state.run_single();
        assert_eq!(state.single_prediction, Some(5.5));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn run_batch_failure_leaves_no_partial_results() {
        let mut state = AppState::default();
        state.set_artifacts(bundle(), PathBuf::from("artifacts.json"));

        // Table is missing the score column entirely.
        let mut table = Table::new(vec!["Substance".into(), "Margins".into()]);
        table.rows.push(vec![
            CellValue::String("methane".into()),
            CellValue::Float(0.5),
        ]);
        state.set_batch(table);
        state.run_batch();

        assert!(state.results.is_none());
        assert!(state.predictions.is_none());
        let msg = state.status_message.as_deref().unwrap();
        assert!(msg.contains("DQ Reliability"), "{msg}");
    }
}
