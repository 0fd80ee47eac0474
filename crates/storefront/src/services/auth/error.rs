//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] corner_shop_core::EmailError),

    /// Wrong password or unknown email. Deliberately doesn't say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// A required field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Email already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl AuthError {
    /// Message safe to show on the login or registration form.
    ///
    /// Returns `None` for server-side failures, which should not be echoed.
    #[must_use]
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::InvalidEmail(_) => Some("Please enter a valid email address".to_string()),
            Self::InvalidCredentials => Some("Invalid credentials".to_string()),
            Self::PasswordMismatch => Some("Passwords do not match".to_string()),
            Self::MissingField(field) => Some(format!("Please enter your {field}")),
            Self::UserAlreadyExists => Some("Email already registered".to_string()),
            Self::WeakPassword(msg) => Some(msg.clone()),
            Self::Repository(_) | Self::PasswordHash => None,
        }
    }
}
