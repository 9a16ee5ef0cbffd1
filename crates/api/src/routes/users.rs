//! User account handlers: registration, login, profile, password changes,
//! and admin promotion.

use axum::{Json, extract::{Path, State}, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartwheel_core::UserId;

use crate::error::{AppError, Result};
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::User;
use crate::services::{AuthService, Registration};
use crate::state::AppState;

/// A user as presented over the wire. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_admin: bool,
    pub mobile_no: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email.into_inner(),
            is_admin: user.is_admin,
            mobile_no: user.mobile_no,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub mobile_no: String,
}

/// `POST /users/register`
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register(Registration {
            first_name: &req.first_name,
            last_name: &req.last_name,
            email: &req.email,
            password: &req.password,
            mobile_no: &req.mobile_no,
        })
        .await?;

    tracing::info!(user_id = %user.id, "User registered");

    // Delivery failures must not fail the registration.
    if let Some(mailer) = state.mailer().cloned() {
        let to = user.email.as_str().to_owned();
        let first_name = user.first_name.clone();
        tokio::spawn(async move {
            if let Err(err) = mailer.send_registration_confirmation(&to, &first_name).await {
                tracing::warn!(error = %err, "Failed to send registration email");
            }
        });
    }

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registered successfully".to_owned(),
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
}

/// `POST /users/login`
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login(&req.email, &req.password).await?;

    let access = state
        .tokens()
        .issue(user.id)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse { access }))
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserProfile,
}

/// `GET /users/details`
pub async fn details(CurrentUser(user): CurrentUser) -> Json<ProfileResponse> {
    Json(ProfileResponse { user: user.into() })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    #[serde(default)]
    pub old_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// `PATCH /users/update-password`
pub async fn update_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    let auth = AuthService::new(state.pool());
    auth.change_password(user.id, &req.old_password, &req.new_password)
        .await?;

    tracing::info!(user_id = %user.id, "Password updated");

    if let Some(mailer) = state.mailer().cloned() {
        let to = user.email.as_str().to_owned();
        tokio::spawn(async move {
            if let Err(err) = mailer.send_password_changed(&to).await {
                tracing::warn!(error = %err, "Failed to send password-changed email");
            }
        });
    }

    Ok(Json(MessageResponse {
        message: "Password updated successfully".to_owned(),
    }))
}

/// `PATCH /users/{id}/set-as-admin`
pub async fn set_as_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Json<ProfileResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.promote_to_admin(UserId::new(id)).await?;

    tracing::info!(user_id = %user.id, promoted_by = %admin.id, "User promoted to admin");

    Ok(Json(ProfileResponse { user: user.into() }))
}
