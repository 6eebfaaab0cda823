//! API error responses.
//!
//! Every error leaves the server as `{ "message": "..." }` with an
//! appropriate status code, matching what the web client expects.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use nextup_core::error::{AuthError, CoreError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        // Detail goes to the log, not the client.
        tracing::error!("internal error: {}", detail.into());
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Something went wrong. Please try again.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => ApiError::bad_request(v.to_string()),
            CoreError::Auth(AuthError::EmailTaken) => {
                ApiError::bad_request(AuthError::EmailTaken.to_string())
            }
            CoreError::Auth(AuthError::InvalidCredentials) => {
                ApiError::unauthorized(AuthError::InvalidCredentials.to_string())
            }
            CoreError::Auth(AuthError::TokenExpired | AuthError::TokenInvalid) => {
                ApiError::unauthorized("Invalid or expired session")
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<nextup_core::error::ValidationError> for ApiError {
    fn from(err: nextup_core::error::ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}
