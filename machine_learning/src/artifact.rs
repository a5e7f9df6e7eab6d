//! On-disk representation of a trained classifier.
//!
//! An artifact is a JSON document naming the features the model was trained on, in order, and
//! the model's parameters:
//!
//! ```json
//! {
//!   "features": ["a", "b"],
//!   "model": { "logistic": { "coef": [0.5, -1.0], "intercept": 0.1 } }
//! }
//! ```

use std::{
    error::Error,
    fmt, fs, io,
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    Classifier, LogisticRegression, MlErr, Model,
    arch::{Sequential, activations::ActFn, layers::Dense},
};

/// A serialized classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    /// The feature names in the order the model expects them, if recorded.
    #[serde(default)]
    pub features: Option<Vec<String>>,
    pub model: ModelSpec,
}

/// Model selection and parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSpec {
    Logistic { coef: Vec<f32>, intercept: f32 },
    Sequential { layers: Vec<LayerSpec> },
}

/// A dense layer's dimensions, trained parameters and activation.
#[derive(Debug, Clone, Deserialize)]
pub struct LayerSpec {
    pub input: NonZeroUsize,
    pub output: NonZeroUsize,
    /// Row-major, `input * output` values.
    pub weights: Vec<f32>,
    pub biases: Vec<f32>,
    #[serde(default)]
    pub act_fn: Option<ActFnSpec>,
}

/// Activation function specification.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActFnSpec {
    Sigmoid {
        #[serde(default = "unit_amp")]
        amp: f32,
    },
    Relu,
    Tanh,
}

fn unit_amp() -> f32 {
    1.
}

impl From<ActFnSpec> for ActFn {
    fn from(spec: ActFnSpec) -> Self {
        match spec {
            ActFnSpec::Sigmoid { amp } => ActFn::sigmoid(amp),
            ActFnSpec::Relu => ActFn::relu(),
            ActFnSpec::Tanh => ActFn::tanh(),
        }
    }
}

/// Failures while reading or building an artifact.
#[derive(Debug)]
pub enum ArtifactErr {
    Io { path: PathBuf, source: io::Error },
    Parse(serde_json::Error),
    FeatureMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    Invalid(MlErr),
}

impl fmt::Display for ArtifactErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactErr::Io { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            ArtifactErr::Parse(e) => write!(f, "invalid model artifact: {e}"),
            ArtifactErr::FeatureMismatch { expected, got } => write!(
                f,
                "the model was trained on features {got:?}, expected {expected:?}"
            ),
            ArtifactErr::Invalid(e) => write!(f, "invalid model: {e}"),
        }
    }
}

impl Error for ArtifactErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ArtifactErr::Io { source, .. } => Some(source),
            ArtifactErr::Parse(e) => Some(e),
            ArtifactErr::Invalid(e) => Some(e),
            ArtifactErr::FeatureMismatch { .. } => None,
        }
    }
}

impl From<MlErr> for ArtifactErr {
    fn from(value: MlErr) -> Self {
        Self::Invalid(value)
    }
}

impl From<serde_json::Error> for ArtifactErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl ModelArtifact {
    /// Reads an artifact from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactErr> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ArtifactErr::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_slice(&data)
    }

    /// Parses an artifact from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self, ArtifactErr> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Builds the classifier this artifact describes.
    ///
    /// # Arguments
    /// * `features` - The feature names, in the order inputs will be laid out.
    ///
    /// # Returns
    /// The model, or an error if it was trained on different features or its parameters are
    /// inconsistent.
    pub fn build(self, features: &[&str]) -> Result<Model, ArtifactErr> {
        if let Some(got) = self.features {
            if got.iter().map(String::as_str).ne(features.iter().copied()) {
                return Err(ArtifactErr::FeatureMismatch {
                    expected: features.iter().map(|s| s.to_string()).collect(),
                    got,
                });
            }
        }

        let model = match self.model {
            ModelSpec::Logistic { coef, intercept } => {
                Model::Logistic(LogisticRegression::new(coef, intercept)?)
            }
            ModelSpec::Sequential { layers } => {
                let layers = layers
                    .into_iter()
                    .map(|l| {
                        Dense::from_raw(
                            (l.input.get(), l.output.get()),
                            l.weights,
                            l.biases,
                            l.act_fn.map(ActFn::from),
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()?;

                let net = Sequential::new(layers)?;
                if !matches!(net.output_size(), 1 | 2) {
                    return Err(MlErr::SizeMismatch {
                        what: "network outputs",
                        got: net.output_size(),
                        expected: 2,
                    }
                    .into());
                }

                Model::Sequential(net)
            }
        };

        if model.n_features() != features.len() {
            return Err(MlErr::SizeMismatch {
                what: "model inputs",
                got: model.n_features(),
                expected: features.len(),
            }
            .into());
        }

        Ok(model)
    }
}

/// Reads the artifact at `path` and builds its classifier for the given feature layout.
pub fn load<P: AsRef<Path>>(path: P, features: &[&str]) -> Result<Model, ArtifactErr> {
    ModelArtifact::from_path(path)?.build(features)
}
