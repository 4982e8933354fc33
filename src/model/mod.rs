/// Prediction layer: pre-trained artifacts and the transform pipeline.
///
/// Architecture:
/// ```text
///   artifacts.json
///        │
///        ▼
///   ┌────────────┐
///   │ artifacts   │  schema + encoders + scaler + model, validated once
///   └────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ pipeline    │  assemble → encode → scale → predict
///   └────────────┘
/// ```
///
/// Everything here is immutable after load; each prediction is a stateless
/// single-pass transform.

pub mod artifacts;
pub mod error;
pub mod pipeline;
