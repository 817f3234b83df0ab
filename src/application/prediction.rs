//! Prediction gateway: One scoring request per call.

use std::sync::Arc;
use std::time::Instant;

use crate::domain::{EncodedFeatureVector, PredictionResult};
use crate::ports::{PredictionError, ScoringService};

/// Service issuing prediction requests against a [`ScoringService`].
///
/// Makes a single attempt per call. Only outcome metadata is logged; feature
/// values and probabilities stay out of the log.
pub struct PredictionGateway<S>
where
    S: ScoringService,
{
    scoring: Arc<S>,
}

impl<S> PredictionGateway<S>
where
    S: ScoringService,
{
    pub fn new(scoring: Arc<S>) -> Self {
        Self { scoring }
    }

    /// Request a risk score for `features`.
    ///
    /// # Errors
    /// Passes through the `PredictionError` reported by the scoring service.
    pub async fn predict(
        &self,
        features: &EncodedFeatureVector,
    ) -> Result<PredictionResult, PredictionError> {
        let started = Instant::now();
        let outcome = self.scoring.predict(features).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            Ok(result) => {
                tracing::info!(risk = %result.risk, elapsed_ms, "prediction completed");
            }
            Err(PredictionError::PredictionFailed { .. }) => {
                tracing::warn!(elapsed_ms, "prediction rejected by scoring service");
            }
            Err(PredictionError::GatewayUnavailable(reason)) => {
                tracing::warn!(elapsed_ms, reason = %reason, "scoring service unavailable");
            }
        }

        outcome
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    //! In-memory scoring service for application tests.

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::domain::{EncodedFeatureVector, PredictionResult, RiskLevel};
    use crate::ports::{PredictionError, ScoringService};

    /// Answers every call with `response`, optionally waiting on `gate` first.
    pub struct FakeScoring {
        pub response: Result<PredictionResult, PredictionError>,
        pub gate: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl FakeScoring {
        pub fn answering(response: Result<PredictionResult, PredictionError>) -> Self {
            Self {
                response,
                gate: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn low_risk() -> Self {
            Self::answering(Ok(PredictionResult::new(RiskLevel::Low, 21.5, "info")))
        }

        pub fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ScoringService for FakeScoring {
        async fn predict(
            &self,
            _features: &EncodedFeatureVector,
        ) -> Result<PredictionResult, PredictionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.response.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeScoring;
    use super::*;
    use crate::domain::{encode, RawFormInput, RiskLevel};

    #[tokio::test]
    async fn test_gateway_passes_result_through() {
        let scoring = Arc::new(FakeScoring::low_risk());
        let gateway = PredictionGateway::new(scoring.clone());

        let result = gateway
            .predict(&encode(&RawFormInput::sample()))
            .await
            .expect("Should predict");
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(scoring.calls(), 1);
    }

    #[tokio::test]
    async fn test_gateway_does_not_retry() {
        let scoring = Arc::new(FakeScoring::answering(Err(
            PredictionError::GatewayUnavailable("connection refused".into()),
        )));
        let gateway = PredictionGateway::new(scoring.clone());

        let err = gateway
            .predict(&encode(&RawFormInput::sample()))
            .await
            .expect_err("Should fail");
        assert!(matches!(err, PredictionError::GatewayUnavailable(_)));
        assert_eq!(scoring.calls(), 1);
    }
}
