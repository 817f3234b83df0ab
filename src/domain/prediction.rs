//! Prediction result types.
//!
//! Represents the response of the remote scoring service.

use serde::{Deserialize, Serialize};

/// Binary risk classification returned by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk of cardiovascular disease
    Low,
    /// High risk, consultation recommended
    High,
}

impl RiskLevel {
    /// Recommendation copy shown next to the score.
    #[must_use]
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Low => "Maintain your healthy lifestyle habits and regular check-ups.",
            Self::High => "Consult a healthcare professional for a detailed evaluation.",
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (16, 185, 129),  // Emerald (#10B981)
            Self::High => (244, 63, 94),  // Rose (#F43F5E)
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Metrics of the model that produced a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub f1_score: f64,
    pub model_name: String,
}

/// Scoring service response for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Risk classification
    pub risk: RiskLevel,

    /// Probability of cardiovascular disease, in percent (0-100)
    pub probability: f64,

    /// General information about cardiovascular disease
    pub general_info: String,

    /// Binary prediction (0 = no disease, 1 = disease)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<u8>,

    /// BMI as computed by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,

    /// Confidence in the predicted class, in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_metrics: Option<ModelMetrics>,
}

impl PredictionResult {
    /// Minimal result holding only the contract fields.
    #[must_use]
    pub fn new(risk: RiskLevel, probability: f64, general_info: impl Into<String>) -> Self {
        Self {
            risk,
            probability,
            general_info: general_info.into(),
            prediction: None,
            bmi: None,
            confidence: None,
            model_metrics: None,
        }
    }

    /// Probability clamped to the displayable 0-100 range.
    #[must_use]
    pub fn probability_percent(&self) -> f64 {
        if self.probability.is_finite() {
            self.probability.clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

/// A prediction as received, with the time it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub result: PredictionResult,
    pub received_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    #[must_use]
    pub fn new(result: PredictionResult) -> Self {
        Self {
            result,
            received_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_service_response() {
        let body = r#"{
            "prediction": 1,
            "bmi": 26.12,
            "risk": "High",
            "probability": 71.3,
            "confidence": 71.3,
            "model_metrics": {"accuracy": 0.734, "f1_score": 0.733, "model_name": "Gradient Boosting"},
            "general_info": "Cardiovascular disease (CVD) is a general term for conditions affecting the heart or blood vessels."
        }"#;

        let result: PredictionResult = serde_json::from_str(body).expect("Should parse");
        assert_eq!(result.risk, RiskLevel::High);
        assert!((result.probability - 71.3).abs() < f64::EPSILON);
        assert_eq!(result.prediction, Some(1));
        assert_eq!(
            result.model_metrics.map(|m| m.model_name),
            Some("Gradient Boosting".to_string())
        );
    }

    #[test]
    fn test_parse_contract_fields_only() {
        let body = r#"{"risk": "Low", "probability": 12.5, "general_info": "info"}"#;
        let result: PredictionResult = serde_json::from_str(body).expect("Should parse");
        assert_eq!(result, PredictionResult::new(RiskLevel::Low, 12.5, "info"));
    }

    #[test]
    fn test_unknown_risk_is_rejected() {
        let body = r#"{"risk": "Moderate", "probability": 50, "general_info": ""}"#;
        assert!(serde_json::from_str::<PredictionResult>(body).is_err());
    }

    #[test]
    fn test_probability_percent_clamps() {
        let mut result = PredictionResult::new(RiskLevel::High, 140.0, "");
        assert!((result.probability_percent() - 100.0).abs() < f64::EPSILON);
        result.probability = f64::NAN;
        assert_eq!(result.probability_percent(), 0.0);
    }
}
