//! Authentication service.
//!
//! Orchestrates registration, login, password changes, and admin promotion.
//! All input validation happens here, before any mutation reaches the
//! repository. Passwords are stored as argon2 PHC hashes, never plaintext.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use cartwheel_core::{Email, UserId};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Fields supplied at registration, already deserialized but unvalidated.
pub struct Registration<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub mobile_no: &'a str,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if a required field is empty.
    /// Returns `AuthError::InvalidEmail` / `InvalidMobileNumber` /
    /// `WeakPassword` on validation failure, and `UserAlreadyExists` if the
    /// email is taken.
    pub async fn register(&self, registration: Registration<'_>) -> Result<User, AuthError> {
        let email = validate_registration(&registration)?;
        let password_hash = hash_password(registration.password)?;

        let user = self
            .users
            .create(NewUser {
                first_name: registration.first_name,
                last_name: registration.last_name,
                email: &email,
                password_hash: &password_hash,
                mobile_no: registration.mobile_no,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email is malformed,
    /// `UnknownEmail` if no account has it, and `InvalidCredentials` if the
    /// password doesn't match.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::UnknownEmail)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Change a user's password after re-verifying the old one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the old password doesn't
    /// match and `WeakPassword` if the new one is too short.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if old_password.is_empty() {
            return Err(AuthError::MissingField("oldPassword"));
        }
        validate_password(new_password)?;

        let current_hash = self.users.get_password_hash(user_id).await?;
        verify_password(old_password, &current_hash)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password_hash(user_id, &new_hash).await?;

        Ok(())
    }

    /// Grant administrator privilege to a user.
    ///
    /// Callers must already have verified that the requester is an admin;
    /// there is no self-service path to this.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository(NotFound)` if the target doesn't exist.
    pub async fn promote_to_admin(&self, user_id: UserId) -> Result<User, AuthError> {
        Ok(self.users.promote_to_admin(user_id).await?)
    }
}

fn validate_registration(registration: &Registration<'_>) -> Result<Email, AuthError> {
    if registration.first_name.is_empty() {
        return Err(AuthError::MissingField("firstName"));
    }
    if registration.last_name.is_empty() {
        return Err(AuthError::MissingField("lastName"));
    }
    if registration.email.is_empty() {
        return Err(AuthError::MissingField("email"));
    }
    if registration.password.is_empty() {
        return Err(AuthError::MissingField("password"));
    }
    if registration.mobile_no.is_empty() {
        return Err(AuthError::MissingField("mobileNo"));
    }

    let email = Email::parse(registration.email)?;
    validate_mobile_number(registration.mobile_no)?;
    validate_password(registration.password)?;

    Ok(email)
}

fn validate_mobile_number(mobile_no: &str) -> Result<(), AuthError> {
    let digits_only = mobile_no.chars().all(|c| c.is_ascii_digit());
    if !digits_only || !(10..=11).contains(&mobile_no.len()) {
        return Err(AuthError::InvalidMobileNumber);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh random salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::Hashing)
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)
}
