//! Form controller: Owns one form session and its submit lifecycle.
//!
//! State machine:
//!
//! ```text
//! Idle ──begin_submit──▶ Submitting ──complete──▶ ResultReady | Failed
//!  ▲                                                     │
//!  └──────────────── update_field / reset ───────────────┘
//! ```
//!
//! Submission is split in three steps so a UI thread can hand the network
//! call to a runtime and apply its result later:
//! 1. [`FormController::begin_submit`] validates and returns a [`SubmitTicket`]
//! 2. [`SubmitTicket::send`] performs the request on any task
//! 3. [`FormController::complete`] applies the [`SubmitCompletion`]
//!
//! Every ticket carries the generation it was issued under. `reset` and
//! `leave` bump the generation, so completions that arrive afterwards are
//! discarded. At most one ticket is outstanding at a time: a reset does not
//! release it, only the matching `complete` does.

use std::sync::Arc;

use crate::domain::metrics::BmiReading;
use crate::domain::{
    encode_checked, Assessment, EncodedFeatureVector, EncodingError, FieldValue, FormField,
    PredictionResult, RawFormInput,
};
use crate::ports::{PredictionError, ScoringService};

use super::PredictionGateway;

/// Why a submission ended without a result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Rejected before sending.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),
}

impl FormError {
    /// Inline message shown next to the submit control.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Encoding(e) => format!("{e}. Please enter numbers only."),
            Self::Prediction(e) => e.user_message(),
        }
    }
}

/// Current state of the form session.
#[derive(Debug, Clone, PartialEq)]
pub enum FormStatus {
    Idle,
    Submitting,
    ResultReady(Assessment),
    Failed(FormError),
}

/// Outcome of [`FormController::begin_submit`].
pub enum SubmitOutcome<S>
where
    S: ScoringService,
{
    /// Request may be sent.
    Ready(SubmitTicket<S>),
    /// A request is already in flight; nothing was started.
    AlreadySubmitting,
    /// Input did not encode; nothing was sent.
    Rejected(EncodingError),
}

/// Permission to send exactly one prediction request.
pub struct SubmitTicket<S>
where
    S: ScoringService,
{
    generation: u64,
    features: EncodedFeatureVector,
    gateway: Arc<PredictionGateway<S>>,
}

impl<S> SubmitTicket<S>
where
    S: ScoringService,
{
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn features(&self) -> &EncodedFeatureVector {
        &self.features
    }

    /// Perform the gateway call.
    pub async fn send(self) -> SubmitCompletion {
        let outcome = self.gateway.predict(&self.features).await;
        SubmitCompletion {
            generation: self.generation,
            outcome,
        }
    }
}

/// Result of a sent ticket, to be applied with [`FormController::complete`].
#[derive(Debug, Clone)]
pub struct SubmitCompletion {
    pub generation: u64,
    pub outcome: Result<PredictionResult, PredictionError>,
}

/// Controller for one prediction form.
pub struct FormController<S>
where
    S: ScoringService,
{
    gateway: Arc<PredictionGateway<S>>,
    input: RawFormInput,
    status: FormStatus,
    generation: u64,
    /// Generation of the outstanding ticket, if any.
    in_flight: Option<u64>,
}

impl<S> FormController<S>
where
    S: ScoringService,
{
    /// Start an empty form session.
    pub fn new(gateway: Arc<PredictionGateway<S>>) -> Self {
        Self::with_input(gateway, RawFormInput::default())
    }

    pub fn with_input(gateway: Arc<PredictionGateway<S>>, input: RawFormInput) -> Self {
        Self {
            gateway,
            input,
            status: FormStatus::Idle,
            generation: 0,
            in_flight: None,
        }
    }

    #[must_use]
    pub fn input(&self) -> &RawFormInput {
        &self.input
    }

    #[must_use]
    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        matches!(self.status, FormStatus::Submitting)
    }

    /// Whether a sent request has not been completed yet.
    ///
    /// This can be true while the status is `Idle`, after a reset.
    #[must_use]
    pub fn has_request_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Live BMI preview of the current input.
    #[must_use]
    pub fn bmi(&self) -> Option<BmiReading> {
        BmiReading::from_form(&self.input.height, &self.input.weight)
    }

    /// Replace one field.
    ///
    /// A shown result or error is cleared. While submitting, the edit is kept
    /// but the in-flight request is unaffected.
    pub fn update_field(&mut self, field: FormField, value: impl Into<FieldValue>) {
        self.input.set(field, value.into());
        if matches!(
            self.status,
            FormStatus::ResultReady(_) | FormStatus::Failed(_)
        ) {
            self.status = FormStatus::Idle;
        }
    }

    /// Validate the input and, if valid, enter `Submitting`.
    pub fn begin_submit(&mut self) -> SubmitOutcome<S> {
        if self.in_flight.is_some() {
            tracing::debug!("submit ignored, request already in flight");
            return SubmitOutcome::AlreadySubmitting;
        }

        match encode_checked(&self.input) {
            Ok(features) => {
                self.status = FormStatus::Submitting;
                self.in_flight = Some(self.generation);
                SubmitOutcome::Ready(SubmitTicket {
                    generation: self.generation,
                    features,
                    gateway: Arc::clone(&self.gateway),
                })
            }
            Err(e) => {
                tracing::info!(error = %e, "submit rejected before sending");
                self.status = FormStatus::Failed(FormError::Encoding(e.clone()));
                SubmitOutcome::Rejected(e)
            }
        }
    }

    /// Apply a completion. Returns `false` if it was stale and discarded.
    pub fn complete(&mut self, completion: SubmitCompletion) -> bool {
        if self.in_flight == Some(completion.generation) {
            self.in_flight = None;
        }
        if completion.generation != self.generation || !self.is_submitting() {
            tracing::debug!(
                ticket = completion.generation,
                current = self.generation,
                "discarding stale prediction response"
            );
            return false;
        }

        self.status = match completion.outcome {
            Ok(result) => FormStatus::ResultReady(Assessment::new(result)),
            Err(e) => FormStatus::Failed(FormError::Prediction(e)),
        };
        true
    }

    /// Begin, send and complete in one call.
    pub async fn submit(&mut self) -> &FormStatus {
        if let SubmitOutcome::Ready(ticket) = self.begin_submit() {
            let completion = ticket.send().await;
            self.complete(completion);
        }
        &self.status
    }

    /// Clear the shown result and return to `Idle`. Input is kept.
    ///
    /// An outstanding request stays outstanding; its response is discarded.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = FormStatus::Idle;
    }

    /// Navigation away from the form: input is discarded.
    pub fn leave(&mut self) {
        self.reset();
        self.input = RawFormInput::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::prediction::fakes::FakeScoring;
    use crate::domain::RiskLevel;
    use tokio::sync::Notify;

    fn controller(scoring: Arc<FakeScoring>) -> FormController<FakeScoring> {
        FormController::with_input(
            Arc::new(PredictionGateway::new(scoring)),
            RawFormInput::sample(),
        )
    }

    fn ticket(outcome: SubmitOutcome<FakeScoring>) -> SubmitTicket<FakeScoring> {
        match outcome {
            SubmitOutcome::Ready(t) => t,
            SubmitOutcome::AlreadySubmitting => panic!("unexpected AlreadySubmitting"),
            SubmitOutcome::Rejected(e) => panic!("unexpected rejection: {e}"),
        }
    }

    #[tokio::test]
    async fn test_submit_success_shows_result() {
        let scoring = Arc::new(FakeScoring::low_risk());
        let mut form = controller(scoring.clone());

        let status = form.submit().await;
        match status {
            FormStatus::ResultReady(a) => assert_eq!(a.result.risk, RiskLevel::Low),
            other => panic!("expected result, got {other:?}"),
        }
        assert_eq!(scoring.calls(), 1);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_sends_nothing() {
        let scoring = Arc::new(FakeScoring::low_risk());
        let mut form = controller(scoring.clone());

        let first = ticket(form.begin_submit());
        assert!(matches!(form.begin_submit(), SubmitOutcome::AlreadySubmitting));
        assert!(matches!(form.begin_submit(), SubmitOutcome::AlreadySubmitting));

        let completion = first.send().await;
        assert!(form.complete(completion));
        assert_eq!(scoring.calls(), 1);
    }

    #[tokio::test]
    async fn test_stale_completion_after_reset_is_discarded() {
        let gate = Arc::new(Notify::new());
        let scoring = Arc::new(FakeScoring::low_risk().gated(gate.clone()));
        let mut form = controller(scoring.clone());

        let in_flight = tokio::spawn(ticket(form.begin_submit()).send());
        form.reset();
        assert_eq!(form.status(), &FormStatus::Idle);

        gate.notify_one();
        let completion = in_flight.await.expect("task should finish");
        assert!(!form.complete(completion));
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[tokio::test]
    async fn test_resubmit_after_reset_waits_for_old_request() {
        let gate = Arc::new(Notify::new());
        let scoring = Arc::new(FakeScoring::low_risk().gated(gate.clone()));
        let mut form = controller(scoring.clone());

        let old = tokio::spawn(ticket(form.begin_submit()).send());
        form.reset();
        assert!(form.has_request_in_flight());
        assert!(matches!(form.begin_submit(), SubmitOutcome::AlreadySubmitting));

        // Let the gated call register before releasing it.
        while scoring.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(scoring.calls(), 1);

        gate.notify_one();
        let old_done = old.await.expect("task should finish");
        assert!(!form.complete(old_done));
        assert!(!form.has_request_in_flight());
        assert_eq!(form.status(), &FormStatus::Idle);

        let new = ticket(form.begin_submit());
        assert_eq!(new.generation(), 1);
        gate.notify_one();
        assert!(form.complete(new.send().await));
        assert!(matches!(form.status(), FormStatus::ResultReady(_)));
        assert_eq!(scoring.calls(), 2);
    }

    #[tokio::test]
    async fn test_leave_discards_input_and_response() {
        let scoring = Arc::new(FakeScoring::low_risk());
        let mut form = controller(scoring);

        let outstanding = ticket(form.begin_submit());
        form.leave();
        assert_eq!(form.input(), &RawFormInput::default());

        assert!(!form.complete(outstanding.send().await));
    }

    #[tokio::test]
    async fn test_invalid_number_fails_without_request() {
        let scoring = Arc::new(FakeScoring::low_risk());
        let mut form = controller(scoring.clone());
        form.update_field(FormField::Age, "forty");

        assert!(matches!(form.begin_submit(), SubmitOutcome::Rejected(_)));
        match form.status() {
            FormStatus::Failed(FormError::Encoding(EncodingError::InvalidNumber { fields })) => {
                assert_eq!(fields, &vec!["age"]);
            }
            other => panic!("expected encoding failure, got {other:?}"),
        }
        assert_eq!(scoring.calls(), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_input_and_edit_returns_to_idle() {
        let scoring = Arc::new(FakeScoring::answering(Err(
            PredictionError::PredictionFailed {
                detail: "invalid age".into(),
            },
        )));
        let mut form = controller(scoring);

        match form.submit().await {
            FormStatus::Failed(e) => assert_eq!(e.user_message(), "invalid age"),
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(form.input(), &RawFormInput::sample());

        form.update_field(FormField::Smoke, true);
        assert_eq!(form.status(), &FormStatus::Idle);
        assert!(form.input().smoke);
    }

    #[test]
    fn test_reset_keeps_input() {
        let mut form = controller(Arc::new(FakeScoring::low_risk()));
        form.reset();
        assert_eq!(form.input(), &RawFormInput::sample());
        assert_eq!(form.generation(), 1);
        assert!(form.bmi().is_some());
    }
}
