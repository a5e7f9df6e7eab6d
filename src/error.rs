use std::{error::Error, fmt};

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use machine_learning::MlErr;
use serde_json::json;

/// Failures surfaced by the HTTP API.
///
/// Every variant renders as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    /// No model could be loaded at startup.
    ServiceUnavailable,
    /// The request couldn't be turned into a prediction.
    Internal(RequestFailure),
}

/// The ways a prediction request can fail once a model is available.
#[derive(Debug)]
pub enum RequestFailure {
    NotJson {
        content_type: String,
    },
    MalformedBody(serde_json::Error),
    NotAnObject,
    MissingField {
        field: &'static str,
    },
    InvalidField {
        field: &'static str,
        expected: FieldKind,
        got: String,
    },
    Prediction(MlErr),
}

/// The type a request field is coerced into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    String,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FieldKind::Integer => "an integer",
            FieldKind::Float => "a float",
            FieldKind::String => "a string",
        };

        write!(f, "{s}")
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::NotJson { content_type } if content_type.is_empty() => {
                write!(f, "the request body must be JSON, no content type was given")
            }
            RequestFailure::NotJson { content_type } => {
                write!(f, "the request body must be JSON, got content type '{content_type}'")
            }
            RequestFailure::MalformedBody(e) => write!(f, "invalid JSON body: {e}"),
            RequestFailure::NotAnObject => write!(f, "the request body must be a JSON object"),
            RequestFailure::MissingField { field } => write!(f, "missing field '{field}'"),
            RequestFailure::InvalidField {
                field,
                expected,
                got,
            } => write!(f, "field '{field}' must be {expected}, got {got}"),
            RequestFailure::Prediction(e) => write!(f, "prediction failed: {e}"),
        }
    }
}

impl Error for RequestFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RequestFailure::MalformedBody(e) => Some(e),
            RequestFailure::Prediction(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MlErr> for RequestFailure {
    fn from(value: MlErr) -> Self {
        Self::Prediction(value)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ServiceUnavailable => write!(f, "Model not loaded"),
            ApiError::Internal(e) => write!(f, "{e}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Internal(e) => Some(e),
            ApiError::ServiceUnavailable => None,
        }
    }
}

impl From<RequestFailure> for ApiError {
    fn from(value: RequestFailure) -> Self {
        Self::Internal(value)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
