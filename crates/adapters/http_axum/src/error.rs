//! HTTP error response mapping.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use intentcp_domain::error::{IntentError, NotFoundError, ParseError, ResolveError, ValidationError};

/// JSON error body returned by every endpoint.
#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    reason: String,
    detail: String,
}

/// Maps [`IntentError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(IntentError);

impl From<IntentError> for ApiError {
    fn from(err: IntentError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<ParseError> for ApiError {
    fn from(err: ParseError) -> Self {
        Self(err.into())
    }
}

impl From<NotFoundError> for ApiError {
    fn from(err: NotFoundError) -> Self {
        Self(err.into())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ValidationError::MalformedQuery(rejection.body_text()).into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self.0 {
            IntentError::Validation(_) | IntentError::Resolve(ResolveError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error".to_string())
            }
            IntentError::Parse(_) => (StatusCode::BAD_REQUEST, "parse_error".to_string()),
            IntentError::NotFound(err) => {
                (StatusCode::NOT_FOUND, format!("unknown_{}", err.entity))
            }
            IntentError::Resolve(ResolveError::UnsupportedAction(_)) => {
                (StatusCode::BAD_REQUEST, "unsupported_action".to_string())
            }
            IntentError::Resolve(ResolveError::MissingTarget(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "missing_target".to_string(),
            ),
            IntentError::Transport(_) => {
                tracing::error!(error = %self.0.detail(), "backend error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "transport_error".to_string(),
                )
            }
        };

        let body = ErrorBody {
            ok: false,
            reason,
            detail: self.0.detail(),
        };
        (status, Json(body)).into_response()
    }
}
