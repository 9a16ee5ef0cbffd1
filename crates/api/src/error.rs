//! Unified error handling.
//!
//! Provides a unified `AppError` type mapping domain failures to HTTP
//! statuses and a JSON `{"error": ...}` body. All route handlers return
//! `Result<T, AppError>`. Server-side failures are logged before the
//! response is built; their details are never exposed to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::AuthError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks the required privilege.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Checkout was attempted on an empty cart.
    #[error("no items to checkout")]
    EmptyCart,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(err) => repository_status(err),
            Self::Auth(err) => auth_status(err),
            Self::Validation(_) | Self::EmptyCart => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details are replaced with an opaque
    /// message; everything else is safe to echo.
    fn message(&self) -> String {
        match self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "internal server error".to_owned()
                }
            },
            Self::Auth(err) => match err {
                AuthError::Repository(RepositoryError::NotFound) => "not found".to_owned(),
                AuthError::Repository(_) | AuthError::Hashing => {
                    "internal server error".to_owned()
                }
                other => other.to_string(),
            },
            // The bare message, without the Display prefix these variants
            // carry for logs.
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg) => msg.clone(),
            Self::EmptyCart => self.to_string(),
            Self::Internal(_) => "internal server error".to_owned(),
        }
    }
}

const fn repository_status(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn auth_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::MissingField(_)
        | AuthError::InvalidEmail(_)
        | AuthError::InvalidMobileNumber
        | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
        AuthError::UserAlreadyExists => StatusCode::CONFLICT,
        AuthError::UnknownEmail => StatusCode::NOT_FOUND,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Hashing => StatusCode::INTERNAL_SERVER_ERROR,
        AuthError::Repository(repo) => repository_status(repo),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request error");
        }

        let body = ErrorBody {
            error: self.message(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            get_status(AppError::Validation("bad input".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("product".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("no token".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("admins only".to_owned())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(get_status(AppError::EmptyCart), StatusCode::BAD_REQUEST);
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            get_status(AppError::Auth(AuthError::WeakPassword)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UnknownEmail)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_repository_error_mapping() {
        assert_eq!(
            get_status(AppError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Conflict(
                "email already exists".to_owned()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::DataCorruption(
                "bad row".to_owned()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_messages_carry_no_display_prefix() {
        assert_eq!(
            AppError::Unauthorized("missing bearer token".to_owned()).message(),
            "missing bearer token"
        );
        assert_eq!(
            AppError::Validation("minPrice must not exceed maxPrice".to_owned()).message(),
            "minPrice must not exceed maxPrice"
        );
        assert_eq!(
            AppError::NotFound("product not found".to_owned()).message(),
            "product not found"
        );
        assert_eq!(
            AppError::Forbidden("action forbidden".to_owned()).message(),
            "action forbidden"
        );
        assert_eq!(AppError::EmptyCart.message(), "no items to checkout");
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = AppError::Database(RepositoryError::DataCorruption(
            "users.email row 17 is garbage".to_owned(),
        ));
        assert_eq!(err.message(), "internal server error");
    }
}
