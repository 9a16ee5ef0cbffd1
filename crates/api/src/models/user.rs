//! User domain types.

use chrono::{DateTime, Utc};

use cartwheel_core::{Email, UserId};

/// A registered user (domain type).
///
/// The password hash is deliberately not part of this type; it never leaves
/// the repository layer except for verification inside the auth service.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// User's email address (unique).
    pub email: Email,
    /// Whether the user holds administrator privilege.
    pub is_admin: bool,
    /// Contact mobile number.
    pub mobile_no: String,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}
