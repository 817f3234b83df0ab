//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. Encoding and metric
//! derivation are plain functions over these types.

mod encoding;
mod form;
pub mod metrics;
mod prediction;
mod stats;

pub use encoding::{
    encode, encode_checked, encode_flag, encode_gender, encode_level, parse_integer, parse_real,
    EncodedFeatureVector, EncodingError, NUMERIC_FEATURES,
};
pub use form::{FieldKind, FieldValue, FormField, RawFormInput, GENDER_OPTIONS, LEVEL_OPTIONS};
pub use prediction::{Assessment, ModelMetrics, PredictionResult, RiskLevel};
pub use stats::{
    ActiveModelDetails, ConfusionMatrix, DataOverview, Hyperparameters, ModelScore,
    ModelStatsSnapshot, ResolvedHyperparameters, DEFAULT_HYPERPARAMETERS,
};
