use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Artifact bundle format version this build understands.
pub const ARTIFACT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Feature schema – the single shared column descriptor
// ---------------------------------------------------------------------------

/// How a feature cell is interpreted by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    /// Closed label set, encoded to an integer code before scaling.
    Categorical,
    /// Unrestricted continuous value.
    Numeric,
    /// Data-quality score, an integer in [0, 5].
    Score,
}

/// One typed field of the training-time feature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    pub kind: FeatureKind,
}

impl FeatureSpec {
    pub fn new(name: &str, kind: FeatureKind) -> Self {
        FeatureSpec {
            name: name.to_string(),
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// LabelEncoder – fixed label → integer code lookup
// ---------------------------------------------------------------------------

/// A fitted categorical encoder: the code of a label is its index in the
/// class list, which is frozen at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new<S: Into<String>>(classes: Vec<S>) -> Self {
        LabelEncoder {
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }

    /// The fixed label set, in code order.  Drives the UI dropdowns.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Label → integer code.  `None` for labels outside the fitted set.
    pub fn encode(&self, label: &str) -> Option<i64> {
        self.classes.iter().position(|c| c == label).map(|i| i as i64)
    }
}

// ---------------------------------------------------------------------------
// StandardScaler – fixed per-column affine transform
// ---------------------------------------------------------------------------

/// A fitted standardization transform: `(x - mean[j]) / scale[j]` per column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        StandardScaler { mean, scale }
    }

    /// Number of columns the scaler was fitted on.
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one encoded row.
    pub fn transform(&self, row: &[f64]) -> std::result::Result<Vec<f64>, PipelineError> {
        if row.len() != self.mean.len() {
            return Err(PipelineError::SchemaMismatch {
                expected: self.mean.len(),
                actual: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&x, (&m, &s))| (x - m) / s)
            .collect())
    }
}

// ---------------------------------------------------------------------------
// LinearModel – the fitted regressor
// ---------------------------------------------------------------------------

/// A fitted linear regression: `dot(coefficients, x) + intercept`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        LinearModel {
            coefficients,
            intercept,
        }
    }

    /// Number of features the model was fitted on.
    pub fn width(&self) -> usize {
        self.coefficients.len()
    }

    /// Predict one scaled row.
    pub fn predict(&self, row: &[f64]) -> std::result::Result<f64, PipelineError> {
        if row.len() != self.coefficients.len() {
            return Err(PipelineError::SchemaMismatch {
                expected: self.coefficients.len(),
                actual: row.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(row)
            .map(|(&c, &x)| c * x)
            .sum();
        Ok(dot + self.intercept)
    }
}

// ---------------------------------------------------------------------------
// ModelArtifacts – everything the pipeline needs, loaded once
// ---------------------------------------------------------------------------

/// The immutable artifact bundle: schema, encoders, scaler, and model, all
/// fitted together at training time and loaded once per process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifacts {
    version: u32,
    /// Ordered feature descriptor; every stage consumes this single schema.
    pub schema: Vec<FeatureSpec>,
    /// One encoder per categorical feature, keyed by feature name.
    pub encoders: BTreeMap<String, LabelEncoder>,
    pub scaler: StandardScaler,
    pub model: LinearModel,
}

impl ModelArtifacts {
    pub fn new(
        schema: Vec<FeatureSpec>,
        encoders: BTreeMap<String, LabelEncoder>,
        scaler: StandardScaler,
        model: LinearModel,
    ) -> Self {
        ModelArtifacts {
            version: ARTIFACT_VERSION,
            schema,
            encoders,
            scaler,
            model,
        }
    }

    /// Load and cross-validate a bundle from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading model artifacts from {}", path.display()))?;
        let artifacts: ModelArtifacts =
            serde_json::from_str(&text).context("parsing model artifacts JSON")?;
        artifacts
            .validate()
            .with_context(|| format!("inconsistent model artifacts in {}", path.display()))?;
        Ok(artifacts)
    }

    /// Serialize the bundle to a JSON file (used by the sample generator).
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, self).context("writing model artifacts JSON")?;
        Ok(())
    }

    /// Check that all components agree on the training-time schema.
    ///
    /// The column-order coupling between encoders, scaler, and model is the
    /// one real correctness risk here, so it is enforced once, loudly, at
    /// load time rather than rediscovered mid-prediction.
    pub fn validate(&self) -> Result<()> {
        if self.version != ARTIFACT_VERSION {
            bail!(
                "unsupported artifact version {} (expected {ARTIFACT_VERSION})",
                self.version
            );
        }
        if self.schema.is_empty() {
            bail!("empty feature schema");
        }
        let width = self.schema.len();
        if self.scaler.scale.len() != self.scaler.mean.len() {
            bail!(
                "scaler has {} mean entries but {} scale entries",
                self.scaler.mean.len(),
                self.scaler.scale.len()
            );
        }
        if self.scaler.width() != width {
            bail!(
                "scaler fitted on {} columns but schema has {width}",
                self.scaler.width()
            );
        }
        if self.model.width() != width {
            bail!(
                "model fitted on {} columns but schema has {width}",
                self.model.width()
            );
        }
        for spec in &self.schema {
            if spec.kind == FeatureKind::Categorical {
                let encoder = self
                    .encoders
                    .get(&spec.name)
                    .with_context(|| format!("no encoder for categorical feature '{}'", spec.name))?;
                if encoder.classes().is_empty() {
                    bail!("encoder for '{}' has an empty label set", spec.name);
                }
            }
        }
        for (name, &s) in self.schema.iter().map(|f| &f.name).zip(&self.scaler.scale) {
            if s == 0.0 || !s.is_finite() {
                bail!("degenerate scale {s} for column '{name}'");
            }
        }
        Ok(())
    }

    /// Encoder for a categorical feature, if one exists.
    pub fn encoder(&self, feature: &str) -> Option<&LabelEncoder> {
        self.encoders.get(feature)
    }

    /// Ordered feature names, as fitted.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.schema.iter().map(|f| f.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_bundle() -> ModelArtifacts {
        let schema = vec![
            FeatureSpec::new("Substance", FeatureKind::Categorical),
            FeatureSpec::new("Margins", FeatureKind::Numeric),
        ];
        let mut encoders = BTreeMap::new();
        encoders.insert(
            "Substance".to_string(),
            LabelEncoder::new(vec!["carbon dioxide", "methane"]),
        );
        ModelArtifacts::new(
            schema,
            encoders,
            StandardScaler::new(vec![0.5, 1.0], vec![0.5, 2.0]),
            LinearModel::new(vec![1.0, -1.0], 0.25),
        )
    }

    #[test]
    fn valid_bundle_passes_validation() {
        small_bundle().validate().unwrap();
    }

    #[test]
    fn encode_is_stable_and_rejects_unknown_labels() {
        let bundle = small_bundle();
        let encoder = bundle.encoder("Substance").unwrap();
        for label in ["carbon dioxide", "methane"] {
            let code = encoder.encode(label).unwrap();
            // Repeated lookups against the fixed table never drift.
            assert_eq!(encoder.encode(label), Some(code));
        }
        assert_eq!(encoder.encode("water vapor"), None);
        assert_eq!(encoder.encode("Methane"), None);
    }

    #[test]
    fn scaler_width_mismatch_fails_validation() {
        let mut bundle = small_bundle();
        bundle.scaler = StandardScaler::new(vec![0.0], vec![1.0]);
        let err = bundle.validate().unwrap_err();
        assert!(err.to_string().contains("scaler"));
    }

    #[test]
    fn ragged_scaler_fails_validation() {
        // scale one entry short of mean: must be rejected at load time, not
        // surface later as a per-prediction width error.
        let mut bundle = small_bundle();
        bundle.scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0]);
        let err = bundle.validate().unwrap_err();
        assert!(err.to_string().contains("scale entries"), "{err}");
    }

    #[test]
    fn model_width_mismatch_fails_validation() {
        let mut bundle = small_bundle();
        bundle.model = LinearModel::new(vec![1.0], 0.0);
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn missing_encoder_fails_validation() {
        let mut bundle = small_bundle();
        bundle.encoders.clear();
        let err = bundle.validate().unwrap_err();
        assert!(format!("{err:#}").contains("Substance"));
    }

    #[test]
    fn zero_scale_fails_validation() {
        let mut bundle = small_bundle();
        bundle.scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 0.0]);
        let err = bundle.validate().unwrap_err();
        assert!(err.to_string().contains("degenerate"));
    }

    #[test]
    fn unsupported_version_fails_validation() {
        let mut bundle = small_bundle();
        bundle.version = 99;
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn save_load_round_trip() {
        let bundle = small_bundle();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        bundle.save(&path).unwrap();

        let loaded = ModelArtifacts::load(&path).unwrap();
        assert_eq!(loaded.schema.len(), 2);
        assert_eq!(
            loaded.encoder("Substance").unwrap().encode("methane"),
            Some(1)
        );
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(ModelArtifacts::load(&path).is_err());
    }

    #[test]
    fn scaler_transform_applies_affine_per_column() {
        let bundle = small_bundle();
        let scaled = bundle.scaler.transform(&[1.0, 3.0]).unwrap();
        assert_eq!(scaled, vec![1.0, 1.0]);

        let err = bundle.scaler.transform(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::SchemaMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }
}
