//! Statistics fetcher for the model insights screen.

use std::sync::Arc;

use crate::domain::metrics::DerivedMetrics;
use crate::domain::ModelStatsSnapshot;
use crate::ports::{StatsError, StatsSource};

/// A fetched snapshot together with its display statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInsights {
    pub snapshot: ModelStatsSnapshot,
    pub derived: DerivedMetrics,
}

impl ModelInsights {
    #[must_use]
    pub fn from_snapshot(snapshot: ModelStatsSnapshot) -> Self {
        let derived = DerivedMetrics::derive(&snapshot);
        Self { snapshot, derived }
    }
}

/// Service for loading the statistics snapshot.
pub struct StatsFetcher<S>
where
    S: StatsSource,
{
    source: Arc<S>,
}

impl<S> StatsFetcher<S>
where
    S: StatsSource,
{
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    /// Fetch the current snapshot.
    ///
    /// # Errors
    /// Returns `StatsError::Unavailable` on any failure.
    pub async fn fetch(&self) -> Result<ModelStatsSnapshot, StatsError> {
        match self.source.fetch_insights().await {
            Ok(snapshot) => {
                tracing::info!(
                    models = snapshot.best_models.len(),
                    model = %snapshot.active_model_details.name,
                    "model statistics loaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                tracing::warn!(error = %e, "model statistics unavailable");
                Err(e)
            }
        }
    }

    /// Fetch the snapshot and derive display statistics from it.
    ///
    /// # Errors
    /// Same as [`StatsFetcher::fetch`].
    pub async fn fetch_insights(&self) -> Result<ModelInsights, StatsError> {
        self.fetch().await.map(ModelInsights::from_snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActiveModelDetails, ConfusionMatrix, DataOverview, ModelScore};
    use async_trait::async_trait;

    struct FixedSource(Result<ModelStatsSnapshot, StatsError>);

    #[async_trait]
    impl StatsSource for FixedSource {
        async fn fetch_insights(&self) -> Result<ModelStatsSnapshot, StatsError> {
            self.0.clone()
        }
    }

    fn snapshot() -> ModelStatsSnapshot {
        ModelStatsSnapshot {
            data_overview: DataOverview::default(),
            best_models: vec![ModelScore {
                name: "Gradient Boosting".into(),
                f1_score: 0.733,
                accuracy: 0.734,
            }],
            active_model_details: ActiveModelDetails {
                name: "Gradient Boosting".into(),
                confusion_matrix: ConfusionMatrix::new(4928, 1592, 1965, 4874),
                roc_auc_score: 0.801,
                metrics_analyzed: 11,
                hyperparameters: None,
            },
        }
    }

    #[tokio::test]
    async fn test_fetch_insights_derives_metrics() {
        let fetcher = StatsFetcher::new(Arc::new(FixedSource(Ok(snapshot()))));
        let insights = fetcher.fetch_insights().await.expect("Should fetch");
        assert_eq!(insights.derived.total_cases, 13359);
        assert_eq!(insights.derived.model_name, "Gradient Boosting");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_unavailable() {
        let fetcher = StatsFetcher::new(Arc::new(FixedSource(Err(StatsError::Unavailable(
            "timeout".into(),
        )))));
        assert!(matches!(
            fetcher.fetch().await,
            Err(StatsError::Unavailable(_))
        ));
    }
}
