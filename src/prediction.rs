use machine_learning::{Classifier, MlErr, label};
use ndarray::{Axis, aview2};
use serde::{Deserialize, Serialize};

use crate::{error::RequestFailure, passenger::Passenger};

pub const SURVIVED: &str = "Survived ✅";
pub const DID_NOT_SURVIVE: &str = "Did Not Survive ❌";

/// The body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub survived: bool,
    pub survival_probability: f64,
    pub death_probability: f64,
    pub confidence: f64,
    pub input_data: InputEcho,
}

/// The request as understood by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEcho {
    pub class: String,
    pub gender: String,
    pub age: f64,
    pub family_size: i64,
    pub fare: f64,
    pub embarked: String,
}

impl From<&Passenger> for InputEcho {
    fn from(passenger: &Passenger) -> Self {
        Self {
            class: passenger.class.label().to_string(),
            gender: passenger.sex.clone(),
            age: passenger.age,
            family_size: passenger.family_size(),
            fare: passenger.fare,
            embarked: passenger.embarked.clone(),
        }
    }
}

/// Runs the classifier on a single passenger.
///
/// # Errors
/// If the classifier rejects the encoded features.
pub fn predict<C>(
    classifier: &C,
    passenger: &Passenger,
) -> Result<PredictionResponse, RequestFailure>
where
    C: Classifier + ?Sized,
{
    let features = passenger.features();
    let x = aview2(std::slice::from_ref(&features));

    let proba = classifier.predict_proba(x)?;
    let row = proba.axis_iter(Axis(0)).next().ok_or(MlErr::SizeMismatch {
        what: "probability rows",
        got: 0,
        expected: 1,
    })?;
    let &[death, survival] = row.as_slice().unwrap_or_default() else {
        return Err(MlErr::SizeMismatch {
            what: "probabilities",
            got: row.len(),
            expected: 2,
        }
        .into());
    };

    let survived = label(death, survival) == 1;
    let (death, survival) = (f64::from(death), f64::from(survival));

    Ok(PredictionResponse {
        prediction: if survived { SURVIVED } else { DID_NOT_SURVIVE }.to_string(),
        survived,
        survival_probability: round4(survival),
        death_probability: round4(death),
        confidence: round4(death.max(survival)),
        input_data: InputEcho::from(passenger),
    })
}

/// Rounds to 4 decimal places.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.).round() / 10_000.
}
