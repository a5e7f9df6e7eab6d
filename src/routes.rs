//! HTTP surface of the service.
//!
//! Routes:
//! - `GET /health` -- whether a model is loaded
//! - `POST /predict` -- survival prediction for one passenger

use actix_cors::Cors;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{ApiError, RequestFailure},
    passenger::Passenger,
    prediction,
    state::{AppState, ModelState},
};

/// Body of the `/health` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Registers the API routes. The [`AppState`] must be provided as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/predict", web::post().to(predict));
}

/// Cross-origin requests are accepted from anywhere.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allow_any_method()
        .allow_any_header()
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    if let ModelState::Unavailable { reason } = state.model() {
        debug!("health check without a model: {reason}");
    }

    HttpResponse::Ok().json(HealthResponse {
        status: "connected".to_string(),
        model_loaded: state.model().is_loaded(),
    })
}

/// The body is taken raw so that a missing model is reported before the body is looked at, and
/// so that malformed JSON answers with the same error shape as any other failure.
async fn predict(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let Some(classifier) = state.model().classifier() else {
        return Err(ApiError::ServiceUnavailable);
    };

    if !is_json(req.content_type()) {
        return Err(RequestFailure::NotJson {
            content_type: req.content_type().to_string(),
        }
        .into());
    }

    let body: Value = serde_json::from_slice(&body).map_err(RequestFailure::MalformedBody)?;
    let passenger = Passenger::from_json(&body)?;
    let response = prediction::predict(classifier, &passenger)?;

    debug!(
        "predicted {} for {:?} (p = {})",
        response.prediction, passenger, response.survival_probability
    );

    Ok(HttpResponse::Ok().json(response))
}

/// `application/json` and the `application/*+json` family.
fn is_json(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();

    content_type == "application/json"
        || content_type
            .strip_prefix("application/")
            .is_some_and(|subtype| subtype.ends_with("+json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_json_content_types() {
        for ct in ["application/json", "Application/JSON", "application/problem+json"] {
            assert!(is_json(ct), "{ct}");
        }
        for ct in ["", "text/plain", "application/x-www-form-urlencoded", "text/json"] {
            assert!(!is_json(ct), "{ct}");
        }
    }
}
