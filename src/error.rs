use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::auth::{dto::MessageResponse, services::AuthError};

/// Errors returned by HTTP handlers, rendered as `{"message": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Auth(AuthError::AlreadyRegistered) => {
                (StatusCode::BAD_REQUEST, "email already registered")
            }
            ApiError::Auth(AuthError::InvalidEmail) => (StatusCode::BAD_REQUEST, "invalid email"),
            ApiError::Auth(AuthError::Unexpected(e)) => {
                error!(error = ?e, "unexpected auth failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
        };
        (status, Json(MessageResponse { message })).into_response()
    }
}
