//! Model statistics snapshot served by the `/insights` endpoint.

use serde::{Deserialize, Serialize};

/// Dataset size before and after cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataOverview {
    pub total_rows: u64,
    pub cleaned_rows: u64,
    pub removed_rows: u64,
}

/// One entry of the model leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    pub name: String,
    /// Fraction in [0, 1]
    pub f1_score: f64,
    /// Fraction in [0, 1]
    pub accuracy: f64,
}

/// Binary confusion matrix laid out as `[[TN, FP], [FN, TP]]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfusionMatrix(pub [[u64; 2]; 2]);

impl ConfusionMatrix {
    #[must_use]
    pub fn new(tn: u64, fp: u64, fn_: u64, tp: u64) -> Self {
        Self([[tn, fp], [fn_, tp]])
    }

    #[must_use]
    pub fn true_negatives(&self) -> u64 {
        self.0[0][0]
    }

    #[must_use]
    pub fn false_positives(&self) -> u64 {
        self.0[0][1]
    }

    #[must_use]
    pub fn false_negatives(&self) -> u64 {
        self.0[1][0]
    }

    #[must_use]
    pub fn true_positives(&self) -> u64 {
        self.0[1][1]
    }

    /// Number of evaluated cases.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().flatten().sum()
    }
}

/// Training hyperparameters as sent by the service.
///
/// Every member may be missing or `null`; see [`Hyperparameters::resolve`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hyperparameters {
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub n_estimators: Option<u32>,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

/// Hyperparameters with every value filled in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHyperparameters {
    pub learning_rate: f64,
    pub n_estimators: u32,
    pub max_depth: u32,
}

/// Values shown when the service does not report a hyperparameter.
pub const DEFAULT_HYPERPARAMETERS: ResolvedHyperparameters = ResolvedHyperparameters {
    learning_rate: 0.1,
    n_estimators: 100,
    max_depth: 3,
};

impl Hyperparameters {
    /// Fill missing values from [`DEFAULT_HYPERPARAMETERS`].
    #[must_use]
    pub fn resolve(&self) -> ResolvedHyperparameters {
        ResolvedHyperparameters {
            learning_rate: self
                .learning_rate
                .unwrap_or(DEFAULT_HYPERPARAMETERS.learning_rate),
            n_estimators: self
                .n_estimators
                .unwrap_or(DEFAULT_HYPERPARAMETERS.n_estimators),
            max_depth: self.max_depth.unwrap_or(DEFAULT_HYPERPARAMETERS.max_depth),
        }
    }
}

/// Evaluation details of the model currently serving predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveModelDetails {
    pub name: String,
    pub confusion_matrix: ConfusionMatrix,
    pub roc_auc_score: f64,
    pub metrics_analyzed: u32,
    #[serde(default)]
    pub hyperparameters: Option<Hyperparameters>,
}

impl ActiveModelDetails {
    /// Hyperparameters with defaults applied.
    #[must_use]
    pub fn resolved_hyperparameters(&self) -> ResolvedHyperparameters {
        self.hyperparameters.unwrap_or_default().resolve()
    }
}

/// Read-only statistics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatsSnapshot {
    #[serde(default)]
    pub data_overview: DataOverview,
    /// Ranked best first
    pub best_models: Vec<ModelScore>,
    pub active_model_details: ActiveModelDetails,
}

impl ModelStatsSnapshot {
    /// Top-ranked model, if the leaderboard is not empty.
    #[must_use]
    pub fn leading_model(&self) -> Option<&ModelScore> {
        self.best_models.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSIGHTS: &str = r#"{
        "data_overview": {"total_rows": 70000, "cleaned_rows": 66795, "removed_rows": 3205},
        "best_models": [
            {"name": "Gradient Boosting", "f1_score": 0.733, "accuracy": 0.734},
            {"name": "Decision Tree", "f1_score": 0.710, "accuracy": 0.732},
            {"name": "Random Forest", "f1_score": 0.708, "accuracy": 0.703}
        ],
        "active_model_details": {
            "name": "Gradient Boosting",
            "confusion_matrix": [[4928, 1592], [1965, 4874]],
            "roc_auc_score": 0.801,
            "metrics_analyzed": 11,
            "hyperparameters": {"learning_rate": 0.05, "n_estimators": 200, "max_depth": null}
        }
    }"#;

    #[test]
    fn test_parse_insights() {
        let snapshot: ModelStatsSnapshot = serde_json::from_str(INSIGHTS).expect("Should parse");
        let matrix = snapshot.active_model_details.confusion_matrix;

        assert_eq!(matrix.true_negatives(), 4928);
        assert_eq!(matrix.false_positives(), 1592);
        assert_eq!(matrix.false_negatives(), 1965);
        assert_eq!(matrix.true_positives(), 4874);
        assert_eq!(matrix.total(), 13359);
        assert_eq!(snapshot.data_overview.removed_rows, 3205);
        assert_eq!(
            snapshot.leading_model().map(|m| m.name.as_str()),
            Some("Gradient Boosting")
        );
    }

    #[test]
    fn test_partial_hyperparameters_use_defaults() {
        let snapshot: ModelStatsSnapshot = serde_json::from_str(INSIGHTS).expect("Should parse");
        let hp = snapshot.active_model_details.resolved_hyperparameters();
        assert!((hp.learning_rate - 0.05).abs() < f64::EPSILON);
        assert_eq!(hp.n_estimators, 200);
        assert_eq!(hp.max_depth, 3);
    }

    #[test]
    fn test_missing_or_empty_hyperparameters() {
        let missing = ActiveModelDetails {
            name: "Gradient Boosting".into(),
            confusion_matrix: ConfusionMatrix::default(),
            roc_auc_score: 0.5,
            metrics_analyzed: 11,
            hyperparameters: None,
        };
        assert_eq!(missing.resolved_hyperparameters(), DEFAULT_HYPERPARAMETERS);

        let empty: Hyperparameters = serde_json::from_str("{}").expect("Should parse");
        assert_eq!(empty.resolve(), DEFAULT_HYPERPARAMETERS);
    }

    #[test]
    fn test_negative_matrix_cell_is_rejected() {
        let body = INSIGHTS.replace("4928", "-1");
        assert!(serde_json::from_str::<ModelStatsSnapshot>(&body).is_err());
    }
}
