pub mod arch;
pub mod artifact;
mod classifier;
pub mod error;
mod linear;

pub use artifact::{ArtifactErr, ModelArtifact};
pub use classifier::{Classifier, Model, label};
pub use error::{MlErr, Result};
pub use linear::LogisticRegression;
