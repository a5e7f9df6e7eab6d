//! HTTP service answering Titanic survival predictions from a pre-trained classifier.
//!
//! The classifier is loaded once at startup into an immutable [`AppState`]; when it can't be
//! loaded the service still starts and `/predict` answers `503`.

pub mod config;
pub mod error;
pub mod loader;
pub mod passenger;
pub mod prediction;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, RequestFailure};
pub use state::{AppState, ModelState};
