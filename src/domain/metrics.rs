//! Display statistics derived from model metadata and form input.
//!
//! Everything here is a pure function of its arguments. Undefined ratios are
//! returned as `NaN`; formatting helpers render them as `"n/a"`.

use super::stats::{ConfusionMatrix, ModelStatsSnapshot};
use crate::domain::encoding::parse_real;

/// Placeholder rendered for undefined values.
pub const UNAVAILABLE: &str = "n/a";

/// Static feature-importance weights (percent) of the deployed model.
pub const FEATURE_IMPORTANCE: [(&str, u8); 7] = [
    ("Systolic BP", 38),
    ("Age", 24),
    ("Cholesterol", 18),
    ("Weight", 12),
    ("Glucose", 5),
    ("Smoke", 2),
    ("Alcohol", 1),
];

/// `TP / (TP + FP) * 100`; `NaN` when no positives were predicted.
#[must_use]
pub fn precision(matrix: &ConfusionMatrix) -> f64 {
    ratio_percent(
        matrix.true_positives(),
        matrix.true_positives() + matrix.false_positives(),
    )
}

/// `TP / (TP + FN) * 100`; `NaN` when there are no actual positives.
#[must_use]
pub fn recall(matrix: &ConfusionMatrix) -> f64 {
    ratio_percent(
        matrix.true_positives(),
        matrix.true_positives() + matrix.false_negatives(),
    )
}

/// Harmonic mean of precision and recall, in percent.
#[must_use]
pub fn f1_from_matrix(matrix: &ConfusionMatrix) -> f64 {
    let p = precision(matrix);
    let r = recall(matrix);
    if p + r > 0.0 {
        2.0 * p * r / (p + r)
    } else {
        f64::NAN
    }
}

fn ratio_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        f64::NAN
    } else {
        numerator as f64 / denominator as f64 * 100.0
    }
}

/// Scale a [0, 1] fraction to percent.
#[must_use]
pub fn to_percent(fraction: f64) -> f64 {
    fraction * 100.0
}

/// One decimal place, or [`UNAVAILABLE`] for non-finite values.
#[must_use]
pub fn format_one_decimal(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.1}")
    } else {
        UNAVAILABLE.to_string()
    }
}

/// Body-mass index from raw form text (height in cm, weight in kg).
///
/// Returns `None` if either value does not parse or height is zero.
#[must_use]
pub fn bmi(height_cm: &str, weight_kg: &str) -> Option<f64> {
    bmi_from_values(parse_real(height_cm), parse_real(weight_kg))
}

/// Body-mass index from numeric values; same rules as [`bmi`].
#[must_use]
pub fn bmi_from_values(height_cm: f64, weight_kg: f64) -> Option<f64> {
    if !height_cm.is_finite() || !weight_kg.is_finite() || height_cm == 0.0 {
        return None;
    }
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    value.is_finite().then_some(value)
}

/// BMI classification used by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// `< 25` Normal, `< 30` Overweight, otherwise Obese.
    #[must_use]
    pub fn classify(bmi: f64) -> Self {
        if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A BMI value together with its category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiReading {
    pub value: f64,
    pub category: BmiCategory,
}

impl BmiReading {
    /// Derive a reading from raw form text, if both inputs are usable.
    ///
    /// The category follows the one-decimal value that is displayed.
    #[must_use]
    pub fn from_form(height_cm: &str, weight_kg: &str) -> Option<Self> {
        bmi(height_cm, weight_kg).map(|value| Self {
            value,
            category: BmiCategory::classify((value * 10.0).round() / 10.0),
        })
    }

    /// e.g. `"25.0 (Overweight)"`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{:.1} ({})", self.value, self.category)
    }
}

/// Statistics shown on the model insights screen.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub model_name: String,
    pub accuracy_pct: f64,
    pub f1_pct: f64,
    pub precision_pct: f64,
    pub recall_pct: f64,
    pub matrix_f1_pct: f64,
    pub roc_auc_pct: f64,
    pub total_cases: u64,
}

impl DerivedMetrics {
    /// Derive display statistics from a snapshot.
    ///
    /// Accuracy and F1 come from the leading leaderboard entry; they are
    /// `NaN` if the leaderboard is empty.
    #[must_use]
    pub fn derive(snapshot: &ModelStatsSnapshot) -> Self {
        let details = &snapshot.active_model_details;
        let matrix = &details.confusion_matrix;
        let leader = snapshot.leading_model();

        Self {
            model_name: leader
                .map(|m| m.name.clone())
                .unwrap_or_else(|| details.name.clone()),
            accuracy_pct: leader.map_or(f64::NAN, |m| to_percent(m.accuracy)),
            f1_pct: leader.map_or(f64::NAN, |m| to_percent(m.f1_score)),
            precision_pct: precision(matrix),
            recall_pct: recall(matrix),
            matrix_f1_pct: f1_from_matrix(matrix),
            roc_auc_pct: to_percent(details.roc_auc_score),
            total_cases: matrix.total(),
        }
    }
}
