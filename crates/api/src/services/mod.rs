//! Application services.

pub mod auth;
pub mod email;
pub mod token;

pub use auth::{AuthError, AuthService, Registration};
pub use email::EmailService;
pub use token::{TokenError, TokenService};
