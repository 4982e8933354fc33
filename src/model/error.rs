use thiserror::Error;

/// Typed failures from the prediction pipeline.
///
/// Artifact *loading* problems are reported through `anyhow` with file
/// context; this enum covers what can go wrong once a consistent artifact
/// set is in memory and user data flows through it.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A categorical value is outside the encoder's fixed label set.
    #[error("unknown {feature} category: '{label}'")]
    UnknownCategory { feature: String, label: String },

    /// Required feature columns are absent from the input (exact name match).
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A row's width does not match the training-time feature count.
    #[error("schema mismatch: expected {expected} features, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    /// A numeric feature cell holds something that is not a number.
    #[error("column '{column}': '{value}' is not numeric")]
    NonNumeric { column: String, value: String },

    /// Positions a row-level failure within a batch input.
    #[error("row {row}: {source}")]
    BatchRow {
        row: usize,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Wrap a row-level error with its batch row number.
    pub fn at_row(self, row: usize) -> Self {
        PipelineError::BatchRow {
            row,
            source: Box::new(self),
        }
    }
}
