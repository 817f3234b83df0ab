//! Statistics port: Trait for the read-only model insights endpoint.

use async_trait::async_trait;

use crate::domain::ModelStatsSnapshot;

/// The statistics snapshot could not be obtained.
///
/// Network, status and parse failures are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    #[error("Statistics unavailable: {0}")]
    Unavailable(String),
}

/// Trait for fetching model statistics.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch the current statistics snapshot.
    ///
    /// # Errors
    /// Returns `StatsError::Unavailable` on any failure.
    async fn fetch_insights(&self) -> Result<ModelStatsSnapshot, StatsError>;
}
