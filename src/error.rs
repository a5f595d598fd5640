use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request-terminal failures of the generation endpoint. Every variant
/// renders as `{ "error": <message> }` so the client never has to parse
/// anything but the one envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("OpenAI API key not configured")]
    Configuration,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Configuration | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
