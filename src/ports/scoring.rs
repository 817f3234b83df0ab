//! Scoring port: Trait for the remote prediction service.
//!
//! The model behind this port is an opaque oracle: it receives an encoded
//! feature vector and answers with a risk score or an error.

use async_trait::async_trait;

use crate::domain::{EncodedFeatureVector, PredictionResult};

/// Message used when the service rejects a request without a `detail`.
pub const GENERIC_PREDICTION_FAILURE: &str = "Prediction failed";

/// Errors that can occur while requesting a prediction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PredictionError {
    /// The service could not be reached or answered with an unreadable body.
    #[error("Scoring service unavailable: {0}")]
    GatewayUnavailable(String),

    /// The service was reached but refused the request.
    #[error("{detail}")]
    PredictionFailed { detail: String },
}

impl PredictionError {
    /// Inline message shown next to the submit control.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::GatewayUnavailable(_) => {
                "Could not reach the prediction service. It may be waking up; please try again in a minute."
                    .to_string()
            }
            Self::PredictionFailed { detail } => detail.clone(),
        }
    }
}

/// Trait for remote risk scoring.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait ScoringService: Send + Sync {
    /// Score one encoded feature vector.
    ///
    /// # Errors
    /// Returns `PredictionError::GatewayUnavailable` on transport failure or
    /// a malformed response, `PredictionError::PredictionFailed` when the
    /// service answers with a non-success status.
    async fn predict(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<PredictionResult, PredictionError>;
}
