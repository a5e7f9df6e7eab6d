use std::path::Path;

use log::{info, warn};
use machine_learning::artifact;

use crate::{passenger::FEATURE_NAMES, state::ModelState};

/// Loads the model artifact at `path`.
///
/// Failing to load is not fatal: the failure is logged and the returned state is
/// [`ModelState::Unavailable`], so the service can still start and report itself unhealthy.
pub fn load_model(path: &Path) -> ModelState {
    match artifact::load(path, &FEATURE_NAMES) {
        Ok(model) => {
            info!("✅ model loaded successfully from {}", path.display());
            ModelState::Loaded(Box::new(model))
        }
        Err(e) => {
            warn!("❌ failed to load model from {}: {e}", path.display());
            warn!("serving without a model, /predict will answer 503");
            ModelState::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}
