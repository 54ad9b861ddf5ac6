//! HTTP error type: every failure renders as `{"error", "status"}` JSON.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::inference::InterpretError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// LLM path failed and fallback to the rule cascade is disabled.
    /// The body also carries the failing `stage`.
    #[error("LLM parsing failed: {source}")]
    Interpretation {
        stage: &'static str,
        source: InterpretError,
    },
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Interpretation { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message, without the variant prefix for plain errors.
    fn message(&self) -> String {
        match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) | ApiError::Internal(msg) => {
                msg.clone()
            }
            ApiError::Interpretation { .. } => self.to_string(),
        }
    }
}

impl From<InterpretError> for ApiError {
    fn from(err: InterpretError) -> Self {
        ApiError::Interpretation {
            stage: err.stage(),
            source: err,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({
            "error": self.message(),
            "status": status.as_u16(),
        });
        if let ApiError::Interpretation { stage, .. } = &self {
            body["stage"] = json!(stage);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
