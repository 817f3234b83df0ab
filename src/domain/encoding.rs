//! Feature encoding for the remote scoring model.
//!
//! Maps [`RawFormInput`] to the eleven-field numeric contract of the
//! `/predict` endpoint. Field order and names match the scoring service:
//! age, gender, height, weight, ap_hi, ap_lo, cholesterol, gluc, smoke,
//! alco, active.

use serde::{Deserialize, Serialize, Serializer};

use super::form::RawFormInput;

/// Errors raised when an encoded vector is not fit to submit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("Invalid number in: {}", .fields.join(", "))]
    InvalidNumber { fields: Vec<&'static str> },
}

/// Numeric feature vector sent to the scoring service.
///
/// Numeric fields hold `NaN` when the source text did not parse. Integer
/// fields serialize as JSON integers and `NaN` serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatureVector {
    /// Age in years
    #[serde(serialize_with = "integer_or_null")]
    pub age: f64,

    /// 2 = male, 1 = anything else
    pub gender: u8,

    /// Height in cm
    #[serde(serialize_with = "integer_or_null")]
    pub height: f64,

    /// Weight in kg
    #[serde(serialize_with = "real_or_null")]
    pub weight: f64,

    /// Systolic blood pressure
    #[serde(serialize_with = "integer_or_null")]
    pub ap_hi: f64,

    /// Diastolic blood pressure
    #[serde(serialize_with = "integer_or_null")]
    pub ap_lo: f64,

    /// 1 = normal, 2 = above normal, 3 = well above normal
    pub cholesterol: u8,

    /// 1 = normal, 2 = above normal, 3 = well above normal
    pub gluc: u8,

    pub smoke: u8,
    pub alco: u8,
    pub active: u8,
}

/// Wire names of the numeric (parsed) fields, in contract order.
pub const NUMERIC_FEATURES: [&str; 5] = ["age", "height", "weight", "ap_hi", "ap_lo"];

impl EncodedFeatureVector {
    /// Values of the parsed numeric fields, ordered as [`NUMERIC_FEATURES`].
    #[must_use]
    pub fn numeric_values(&self) -> [f64; 5] {
        [self.age, self.height, self.weight, self.ap_hi, self.ap_lo]
    }

    /// Check that every numeric field holds a finite number.
    ///
    /// # Errors
    /// Returns `EncodingError::InvalidNumber` naming every field that failed
    /// to parse.
    pub fn validate(&self) -> Result<(), EncodingError> {
        let fields: Vec<&'static str> = NUMERIC_FEATURES
            .iter()
            .zip(self.numeric_values())
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
            .collect();

        if fields.is_empty() {
            Ok(())
        } else {
            Err(EncodingError::InvalidNumber { fields })
        }
    }
}

/// Encode raw form input into the scoring contract.
///
/// Never fails: unparseable numbers become `NaN` and unknown categories take
/// the encodings documented on each helper.
#[must_use]
pub fn encode(input: &RawFormInput) -> EncodedFeatureVector {
    EncodedFeatureVector {
        age: parse_integer(&input.age),
        gender: encode_gender(&input.gender),
        height: parse_integer(&input.height),
        weight: parse_real(&input.weight),
        ap_hi: parse_integer(&input.systolic),
        ap_lo: parse_integer(&input.diastolic),
        cholesterol: encode_level(&input.cholesterol),
        gluc: encode_level(&input.glucose),
        smoke: encode_flag(input.smoke),
        alco: encode_flag(input.alcohol),
        active: encode_flag(input.active),
    }
}

/// [`encode`] followed by [`EncodedFeatureVector::validate`].
///
/// # Errors
/// Returns `EncodingError` if any numeric field did not parse.
pub fn encode_checked(input: &RawFormInput) -> Result<EncodedFeatureVector, EncodingError> {
    let encoded = encode(input);
    encoded.validate()?;
    Ok(encoded)
}

/// `"male"` → 2, every other value (including empty) → 1.
#[must_use]
pub fn encode_gender(value: &str) -> u8 {
    if value == "male" {
        2
    } else {
        1
    }
}

/// `"normal"` → 1, `"above"` → 2, anything else → 3.
///
/// An unset level is encoded as the highest severity.
#[must_use]
pub fn encode_level(value: &str) -> u8 {
    match value {
        "normal" => 1,
        "above" => 2,
        _ => 3,
    }
}

#[must_use]
pub fn encode_flag(value: bool) -> u8 {
    u8::from(value)
}

/// Parse an integer field; a fractional part is truncated.
#[must_use]
pub fn parse_integer(text: &str) -> f64 {
    parse_real(text).trunc()
}

/// Parse a real field; anything that is not a finite number becomes `NaN`.
#[must_use]
pub fn parse_real(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

fn integer_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        // Truncated on parse, so the cast only drops a zero fraction.
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_none()
    }
}

fn real_or_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else {
        serializer.serialize_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_input() -> RawFormInput {
        RawFormInput {
            age: "45".into(),
            gender: "male".into(),
            height: "175".into(),
            weight: "80".into(),
            systolic: "130".into(),
            diastolic: "85".into(),
            cholesterol: "above".into(),
            glucose: "normal".into(),
            smoke: false,
            alcohol: false,
            active: true,
        }
    }

    #[test]
    fn test_reference_vector() {
        let encoded = encode(&reference_input());
        let expected = EncodedFeatureVector {
            age: 45.0,
            gender: 2,
            height: 175.0,
            weight: 80.0,
            ap_hi: 130.0,
            ap_lo: 85.0,
            cholesterol: 2,
            gluc: 1,
            smoke: 0,
            alco: 0,
            active: 1,
        };
        assert_eq!(encoded, expected);
        assert!(encoded.validate().is_ok());
    }

    #[test]
    fn test_reference_vector_wire_shape() {
        let json = serde_json::to_value(encode(&reference_input())).expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "age": 45, "gender": 2, "height": 175, "weight": 80.0,
                "ap_hi": 130, "ap_lo": 85, "cholesterol": 2, "gluc": 1,
                "smoke": 0, "alco": 0, "active": 1
            })
        );
    }

    #[test]
    fn test_gender_encoding() {
        assert_eq!(encode_gender("male"), 2);
        assert_eq!(encode_gender("female"), 1);
        assert_eq!(encode_gender(""), 1);
        assert_eq!(encode_gender("Male"), 1);
    }

    #[test]
    fn test_level_encoding() {
        assert_eq!(encode_level("normal"), 1);
        assert_eq!(encode_level("above"), 2);
        assert_eq!(encode_level("high"), 3);
        assert_eq!(encode_level(""), 3);
        assert_eq!(encode_level("unknown"), 3);
    }

    #[test]
    fn test_unparseable_numbers_are_nan_not_zero() {
        let mut input = reference_input();
        input.age = String::new();
        input.weight = "heavy".into();

        let encoded = encode(&input);
        assert!(encoded.age.is_nan());
        assert!(encoded.weight.is_nan());

        let err = encoded.validate().expect_err("Should reject NaN fields");
        assert_eq!(
            err,
            EncodingError::InvalidNumber {
                fields: vec!["age", "weight"]
            }
        );
        assert!(encode_checked(&input).is_err());

        let json = serde_json::to_value(encoded).expect("Should serialize");
        assert!(json["age"].is_null());
        assert!(json["weight"].is_null());
    }

    #[test]
    fn test_integer_fields_truncate_and_accept_whitespace() {
        assert_eq!(parse_integer(" 45.7 "), 45.0);
        assert_eq!(parse_integer("-3"), -3.0);
        assert!(parse_integer("inf").is_nan());
        assert!(parse_real("NaN").is_nan());
        assert_eq!(parse_real("72.25"), 72.25);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let input = reference_input();
        assert_eq!(encode(&input), encode(&input));
    }
}
