//! Application layer: Use cases and services.
//!
//! Services are generic over ports and hold them as `Arc`, so the TUI worker
//! can share them with tasks on the runtime.

mod form;
mod prediction;
mod stats;

pub use form::{FormController, FormError, FormStatus, SubmitCompletion, SubmitOutcome, SubmitTicket};
pub use prediction::PredictionGateway;
pub use stats::{ModelInsights, StatsFetcher};

#[cfg(test)]
pub(crate) use prediction::fakes;
