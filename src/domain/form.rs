//! Raw form input for cardiovascular risk assessment.
//!
//! Values are kept exactly as typed or selected; nothing is validated until
//! the encoder runs.

use serde::{Deserialize, Serialize};

/// Raw, unvalidated form state as entered by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFormInput {
    /// Age in years (free text)
    pub age: String,

    /// "male", "female", or empty when unset
    pub gender: String,

    /// Height in cm (free text)
    pub height: String,

    /// Weight in kg (free text)
    pub weight: String,

    /// Systolic blood pressure in mmHg (free text)
    pub systolic: String,

    /// Diastolic blood pressure in mmHg (free text)
    pub diastolic: String,

    /// "normal", "above", "high", or empty
    pub cholesterol: String,

    /// "normal", "above", "high", or empty
    pub glucose: String,

    pub smoke: bool,
    pub alcohol: bool,
    pub active: bool,
}

/// Names a single field of [`RawFormInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Age,
    Gender,
    Height,
    Weight,
    Systolic,
    Diastolic,
    Cholesterol,
    Glucose,
    Smoke,
    Alcohol,
    Active,
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free numeric text
    Numeric,
    /// One of a fixed set of options
    Select(&'static [&'static str]),
    /// Yes/no toggle
    Toggle,
}

/// Gender options offered by the form.
pub const GENDER_OPTIONS: &[&str] = &["male", "female"];

/// Cholesterol/glucose options offered by the form, in severity order.
pub const LEVEL_OPTIONS: &[&str] = &["normal", "above", "high"];

impl FormField {
    /// All fields in form order.
    pub const ALL: [FormField; 11] = [
        FormField::Age,
        FormField::Gender,
        FormField::Height,
        FormField::Weight,
        FormField::Systolic,
        FormField::Diastolic,
        FormField::Cholesterol,
        FormField::Glucose,
        FormField::Smoke,
        FormField::Alcohol,
        FormField::Active,
    ];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Gender => "Gender",
            Self::Height => "Height",
            Self::Weight => "Weight",
            Self::Systolic => "Systolic BP",
            Self::Diastolic => "Diastolic BP",
            Self::Cholesterol => "Cholesterol",
            Self::Glucose => "Glucose",
            Self::Smoke => "Smoker",
            Self::Alcohol => "Alcohol",
            Self::Active => "Physically active",
        }
    }

    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Age => "years",
            Self::Gender => "male / female",
            Self::Height => "cm",
            Self::Weight => "kg",
            Self::Systolic => "mmHg (upper)",
            Self::Diastolic => "mmHg (lower)",
            Self::Cholesterol | Self::Glucose => "normal / above / high",
            Self::Smoke | Self::Alcohol | Self::Active => "yes / no",
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Age | Self::Height | Self::Weight | Self::Systolic | Self::Diastolic => {
                FieldKind::Numeric
            }
            Self::Gender => FieldKind::Select(GENDER_OPTIONS),
            Self::Cholesterol | Self::Glucose => FieldKind::Select(LEVEL_OPTIONS),
            Self::Smoke | Self::Alcohol | Self::Active => FieldKind::Toggle,
        }
    }
}

/// New value for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl RawFormInput {
    /// Replace one field.
    ///
    /// A text value given to a toggle is read as "yes"/"true"/"1"; a flag
    /// given to a text field is written as "true"/"false".
    pub fn set(&mut self, field: FormField, value: FieldValue) {
        match (field, value) {
            (FormField::Smoke, v) => self.smoke = as_flag(v),
            (FormField::Alcohol, v) => self.alcohol = as_flag(v),
            (FormField::Active, v) => self.active = as_flag(v),
            (text_field, v) => {
                if let Some(slot) = self.text_mut(text_field) {
                    *slot = as_text(v);
                }
            }
        }
    }

    /// Current value of a field.
    #[must_use]
    pub fn get(&self, field: FormField) -> FieldValue {
        match field {
            FormField::Smoke => FieldValue::Flag(self.smoke),
            FormField::Alcohol => FieldValue::Flag(self.alcohol),
            FormField::Active => FieldValue::Flag(self.active),
            FormField::Age => FieldValue::Text(self.age.clone()),
            FormField::Gender => FieldValue::Text(self.gender.clone()),
            FormField::Height => FieldValue::Text(self.height.clone()),
            FormField::Weight => FieldValue::Text(self.weight.clone()),
            FormField::Systolic => FieldValue::Text(self.systolic.clone()),
            FormField::Diastolic => FieldValue::Text(self.diastolic.clone()),
            FormField::Cholesterol => FieldValue::Text(self.cholesterol.clone()),
            FormField::Glucose => FieldValue::Text(self.glucose.clone()),
        }
    }

    fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Age => Some(&mut self.age),
            FormField::Gender => Some(&mut self.gender),
            FormField::Height => Some(&mut self.height),
            FormField::Weight => Some(&mut self.weight),
            FormField::Systolic => Some(&mut self.systolic),
            FormField::Diastolic => Some(&mut self.diastolic),
            FormField::Cholesterol => Some(&mut self.cholesterol),
            FormField::Glucose => Some(&mut self.glucose),
            FormField::Smoke | FormField::Alcohol | FormField::Active => None,
        }
    }

    /// A typical middle-aged patient, for demos and quick checks.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: "45".to_string(),
            gender: "male".to_string(),
            height: "175".to_string(),
            weight: "80".to_string(),
            systolic: "130".to_string(),
            diastolic: "85".to_string(),
            cholesterol: "above".to_string(),
            glucose: "normal".to_string(),
            smoke: false,
            alcohol: false,
            active: true,
        }
    }
}

fn as_flag(value: FieldValue) -> bool {
    match value {
        FieldValue::Flag(b) => b,
        FieldValue::Text(s) => matches!(s.trim(), "1" | "true" | "TRUE" | "yes" | "YES"),
    }
}

fn as_text(value: FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s,
        FieldValue::Flag(b) => b.to_string(),
    }
}
