//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and the remote scoring and statistics services.

mod scoring;
mod stats_source;

pub use scoring::{PredictionError, ScoringService, GENERIC_PREDICTION_FAILURE};
pub use stats_source::{StatsError, StatsSource};
