use machine_learning::Classifier;

/// A classifier shareable across the HTTP workers.
pub type SharedClassifier = Box<dyn Classifier + Send + Sync>;

/// Whether a model is available to answer predictions.
pub enum ModelState {
    Loaded(SharedClassifier),
    Unavailable { reason: String },
}

impl ModelState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, ModelState::Loaded(_))
    }

    /// Returns the classifier, if one was loaded.
    pub fn classifier(&self) -> Option<&(dyn Classifier + Send + Sync)> {
        match self {
            ModelState::Loaded(classifier) => Some(classifier.as_ref()),
            ModelState::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelState::Loaded(classifier) => f
                .debug_struct("Loaded")
                .field("n_features", &classifier.n_features())
                .finish_non_exhaustive(),
            ModelState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// State shared by every request, built once at startup and never mutated afterwards.
#[derive(Debug)]
pub struct AppState {
    model: ModelState,
}

impl AppState {
    pub fn new(model: ModelState) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }
}
