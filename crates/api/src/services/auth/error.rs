//! Authentication error types.

use thiserror::Error;

use cartwheel_core::EmailError;

use crate::db::RepositoryError;

/// Errors from registration, login, and credential changes.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required field was missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Mobile number failed validation.
    #[error("mobile number must be 10-11 digits")]
    InvalidMobileNumber,

    /// Password doesn't meet requirements.
    #[error("password must be at least {min} characters", min = super::MIN_PASSWORD_LENGTH)]
    WeakPassword,

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// No account is registered under this email.
    #[error("no account found for this email")]
    UnknownEmail,

    /// Email and password do not match.
    #[error("email and password do not match")]
    InvalidCredentials,

    /// Password hashing failed.
    #[error("password hashing failed")]
    Hashing,

    /// Underlying repository error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
