//! Mapping of a prediction request body into the model's feature vector.
//!
//! Fields arrive as strings or numbers (HTML forms send everything as strings) and are coerced
//! field by field, in feature order; the first field that can't be coerced fails the request.

use serde_json::{Map, Value};

use crate::error::{FieldKind, RequestFailure};

/// The features the model was trained on, in order.
pub const FEATURE_NAMES: [&str; NUM_FEATURES] =
    ["Pclass", "Sex", "Age", "SibSp", "Parch", "Fare", "Embarked"];

pub const NUM_FEATURES: usize = 7;

/// A single encoded input row.
pub type FeatureVector = [f32; NUM_FEATURES];

/// Ticket class as echoed back to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerClass {
    First,
    Second,
    Third,
}

impl PassengerClass {
    /// Derives the class from the raw `Pclass` value. Only the strings `"1"` and `"2"` name the
    /// upper classes, everything else (numbers included) falls through to third class.
    pub fn from_raw(raw: &Value) -> Self {
        match raw.as_str() {
            Some("1") => PassengerClass::First,
            Some("2") => PassengerClass::Second,
            _ => PassengerClass::Third,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PassengerClass::First => "1st Class",
            PassengerClass::Second => "2nd Class",
            PassengerClass::Third => "3rd Class",
        }
    }
}

/// A coerced prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub pclass: i64,
    pub class: PassengerClass,
    pub sex: String,
    pub age: f64,
    pub sib_sp: i64,
    pub parch: i64,
    pub fare: f64,
    pub embarked: String,
}

impl Passenger {
    /// Coerces a request body into a `Passenger`.
    ///
    /// # Errors
    /// If the body isn't an object, a field is missing or a field can't be coerced.
    pub fn from_json(body: &Value) -> Result<Self, RequestFailure> {
        let fields = body.as_object().ok_or(RequestFailure::NotAnObject)?;

        Ok(Self {
            pclass: int_field(fields, "Pclass")?,
            sex: str_field(fields, "Sex")?.to_string(),
            age: float_field(fields, "Age")?,
            sib_sp: int_field(fields, "SibSp")?,
            parch: int_field(fields, "Parch")?,
            fare: float_field(fields, "Fare")?,
            embarked: str_field(fields, "Embarked")?.to_string(),
            class: PassengerClass::from_raw(field(fields, "Pclass")?),
        })
    }

    /// Encodes the passenger in [`FEATURE_NAMES`] order.
    pub fn features(&self) -> FeatureVector {
        [
            narrow(self.pclass as f64),
            encode_sex(&self.sex),
            narrow(self.age),
            narrow(self.sib_sp as f64),
            narrow(self.parch as f64),
            narrow(self.fare),
            encode_embarked(&self.embarked),
        ]
    }

    /// Returns the passenger plus the siblings, spouses, parents and children aboard.
    pub fn family_size(&self) -> i64 {
        self.sib_sp.saturating_add(self.parch).saturating_add(1)
    }
}

/// `female` in any case is `0`, anything else `1`.
pub fn encode_sex(sex: &str) -> f32 {
    if sex.to_lowercase() == "female" { 0. } else { 1. }
}

/// `C`, `Q` and `S` in any case are `0`, `1` and `2`; unknown ports are treated as `S`.
pub fn encode_embarked(port: &str) -> f32 {
    match port.to_uppercase().as_str() {
        "C" => 0.,
        "Q" => 1.,
        _ => 2.,
    }
}

/// Converts to `f32`, saturating finite values at the `f32` range instead of overflowing to
/// infinity. NaN and infinities are kept as they are.
fn narrow(x: f64) -> f32 {
    if x.is_finite() {
        x.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
    } else {
        x as f32
    }
}

fn field<'a>(
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a Value, RequestFailure> {
    fields
        .get(name)
        .ok_or(RequestFailure::MissingField { field: name })
}

fn invalid(name: &'static str, expected: FieldKind, got: &Value) -> RequestFailure {
    RequestFailure::InvalidField {
        field: name,
        expected,
        got: got.to_string(),
    }
}

/// Integers may be sent as JSON integers, as floats (truncated), as booleans or as base 10 strings.
fn int_field(fields: &Map<String, Value>, name: &'static str) -> Result<i64, RequestFailure> {
    let value = field(fields, name)?;

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| invalid(name, FieldKind::Integer, value))
}

/// Floats may be sent as JSON numbers, as booleans or as strings.
fn float_field(fields: &Map<String, Value>, name: &'static str) -> Result<f64, RequestFailure> {
    let value = field(fields, name)?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| invalid(name, FieldKind::Float, value))
}

fn str_field<'a>(
    fields: &'a Map<String, Value>,
    name: &'static str,
) -> Result<&'a str, RequestFailure> {
    let value = field(fields, name)?;
    value
        .as_str()
        .ok_or_else(|| invalid(name, FieldKind::String, value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn rose() -> Value {
        json!({
            "Pclass": "1",
            "Sex": "female",
            "Age": 29,
            "SibSp": 0,
            "Parch": 0,
            "Fare": 211.3,
            "Embarked": "S"
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = rose();
        body[field] = value;
        body
    }

    #[test]
    fn maps_fields_in_feature_order() {
        let passenger = Passenger::from_json(&rose()).unwrap();

        assert_eq!(passenger.class, PassengerClass::First);
        assert_eq!(passenger.family_size(), 1);
        assert_eq!(passenger.features(), [1.0, 0.0, 29.0, 0.0, 0.0, 211.3, 2.0]);
    }

    #[test]
    fn accepts_form_strings() {
        let body = json!({
            "Pclass": "3",
            "Sex": "male",
            "Age": "20",
            "SibSp": " 1 ",
            "Parch": "2",
            "Fare": "7.25",
            "Embarked": "q"
        });
        let passenger = Passenger::from_json(&body).unwrap();

        assert_eq!(passenger.pclass, 3);
        assert_eq!(passenger.age, 20.0);
        assert_eq!(passenger.family_size(), 4);
        assert_eq!(passenger.features(), [3.0, 1.0, 20.0, 1.0, 2.0, 7.25, 1.0]);
        assert_eq!(passenger.embarked, "q");
    }

    #[test]
    fn float_integers_are_truncated() {
        let passenger = Passenger::from_json(&with("SibSp", json!(2.9))).unwrap();
        assert_eq!(passenger.sib_sp, 2);
    }

    #[test]
    fn booleans_count_as_zero_or_one() {
        let mut body = with("SibSp", json!(true));
        body["Parch"] = json!(false);
        body["Age"] = json!(true);

        let passenger = Passenger::from_json(&body).unwrap();
        assert_eq!(passenger.sib_sp, 1);
        assert_eq!(passenger.parch, 0);
        assert_eq!(passenger.age, 1.0);
        assert_eq!(passenger.family_size(), 2);
    }

    #[test]
    fn huge_values_saturate_instead_of_overflowing() {
        for fare in [json!(1e39), json!("1e39"), json!(3.5e38)] {
            let passenger = Passenger::from_json(&with("Fare", fare)).unwrap();
            assert_eq!(passenger.features()[5], f32::MAX);
        }

        let passenger = Passenger::from_json(&with("Age", json!(-1e300))).unwrap();
        assert_eq!(passenger.features()[2], f32::MIN);

        let passenger = Passenger::from_json(&with("Fare", json!("nan"))).unwrap();
        assert!(passenger.features()[5].is_nan());
    }

    #[test]
    fn sex_is_case_insensitive() {
        for sex in ["female", "Female", "FEMALE", "fEmAlE"] {
            assert_eq!(encode_sex(sex), 0.0, "{sex}");
        }
        for sex in ["male", "Male", "", "woman", "female "] {
            assert_eq!(encode_sex(sex), 1.0, "{sex}");
        }
    }

    #[test]
    fn embarked_is_case_insensitive_with_fallback() {
        assert_eq!(encode_embarked("C"), 0.0);
        assert_eq!(encode_embarked("c"), 0.0);
        assert_eq!(encode_embarked("Q"), 1.0);
        assert_eq!(encode_embarked("q"), 1.0);
        assert_eq!(encode_embarked("S"), 2.0);
        assert_eq!(encode_embarked("s"), 2.0);
        assert_eq!(encode_embarked("X"), 2.0);
        assert_eq!(encode_embarked(""), 2.0);
    }

    #[test]
    fn class_label_compares_raw_strings() {
        assert_eq!(PassengerClass::from_raw(&json!("1")).label(), "1st Class");
        assert_eq!(PassengerClass::from_raw(&json!("2")).label(), "2nd Class");
        for raw in [json!("3"), json!(""), json!("9"), json!(1), json!(2), json!(" 1")] {
            assert_eq!(PassengerClass::from_raw(&raw).label(), "3rd Class", "{raw}");
        }
    }

    #[test]
    fn numeric_pclass_still_predicts_as_third_class_label() {
        let passenger = Passenger::from_json(&with("Pclass", json!(1))).unwrap();
        assert_eq!(passenger.pclass, 1);
        assert_eq!(passenger.class, PassengerClass::Third);
        assert_eq!(passenger.features()[0], 1.0);
    }

    #[test]
    fn family_size_counts_everyone() {
        for (sib_sp, parch) in [(0, 0), (1, 0), (0, 3), (4, 2)] {
            let mut body = with("SibSp", json!(sib_sp));
            body["Parch"] = json!(parch);

            let passenger = Passenger::from_json(&body).unwrap();
            assert_eq!(passenger.family_size(), sib_sp + parch + 1);
        }
    }

    #[test]
    fn reports_missing_fields() {
        let mut body = rose();
        body.as_object_mut().unwrap().remove("Fare");

        let err = Passenger::from_json(&body).unwrap_err();
        assert!(matches!(err, RequestFailure::MissingField { field: "Fare" }));
    }

    #[test]
    fn reports_uncoercible_fields() {
        let err = Passenger::from_json(&with("Age", json!("not-a-number"))).unwrap_err();
        assert!(matches!(
            err,
            RequestFailure::InvalidField {
                field: "Age",
                expected: FieldKind::Float,
                ..
            }
        ));

        for bad in [json!("3.5"), json!("three"), json!(null), json!([1]), json!({})] {
            let err = Passenger::from_json(&with("Pclass", bad)).unwrap_err();
            assert!(matches!(
                err,
                RequestFailure::InvalidField {
                    field: "Pclass",
                    expected: FieldKind::Integer,
                    ..
                }
            ));
        }

        let err = Passenger::from_json(&with("Sex", json!(0))).unwrap_err();
        assert!(matches!(
            err,
            RequestFailure::InvalidField {
                field: "Sex",
                expected: FieldKind::String,
                ..
            }
        ));
    }

    #[test]
    fn rejects_non_objects() {
        for body in [json!([]), json!("Pclass"), json!(null)] {
            assert!(matches!(
                Passenger::from_json(&body),
                Err(RequestFailure::NotAnObject)
            ));
        }
    }
}
