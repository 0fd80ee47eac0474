//! Unified error handling with Sentry integration.
//!
//! Route handlers return `Result<T, AppError>`. Server-side failures are
//! captured to Sentry before responding; every error renders as a JSON body
//! `{"message": ...}` with a matching status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use corner_shop_core::{CartError, CartItemError, PriceError};

use crate::db::RepositoryError;
use crate::services::CartSessionError;
use crate::services::auth::AuthError;
use crate::services::uploads::UploadError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A cart operation was refused.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// Upload could not be stored.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Request body or form failed validation.
    #[error("{0}")]
    Validation(String),
}

impl From<CartSessionError> for AppError {
    fn from(err: CartSessionError) -> Self {
        match err {
            CartSessionError::Cart(e) => Self::Cart(e),
            CartSessionError::Repository(e) => Self::Database(e),
            CartSessionError::Session(e) => Self::Session(e),
        }
    }
}

impl From<CartItemError> for AppError {
    fn from(err: CartItemError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PriceError> for AppError {
    fn from(err: PriceError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl AppError {
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(_) | Self::Session(_) => true,
            Self::Upload(e) => matches!(e, UploadError::Io(_)),
            Self::Auth(e) => e.user_message().is_none(),
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::UserAlreadyExists) => StatusCode::CONFLICT,
            _ if self.is_server_error() => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the client. Internal details stay in the logs.
    fn client_message(&self) -> String {
        match self {
            Self::Auth(err) => err
                .user_message()
                .unwrap_or_else(|| "Internal server error".to_string()),
            Self::Cart(err) => err.to_string(),
            Self::Upload(UploadError::Io(_)) => "Could not store upload".to_string(),
            Self::Upload(err) => err.to_string(),
            Self::Validation(msg) => msg.clone(),
            _ if self.is_server_error() => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            message: self.client_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for the signed-in customer.
pub fn set_sentry_user(user_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for a cart or checkout action.
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_empty_cart_is_bad_request() {
        let (status, body) = render(CartError::Empty.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Cart is empty!");
    }

    #[tokio::test]
    async fn test_validation_message_passes_through() {
        let (status, body) = render(AppError::Validation("qty must be a number".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "qty must be a number");
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let err = AppError::Database(RepositoryError::DataCorruption("bad row 7".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_auth_statuses() {
        let (status, body) = render(AuthError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");

        let (status, _) = render(AuthError::UserAlreadyExists.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = render(AuthError::PasswordHash.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_cart_session_error_maps_to_variants() {
        let err: AppError = CartSessionError::Cart(CartError::Empty).into();
        assert!(matches!(err, AppError::Cart(CartError::Empty)));

        let err: AppError =
            CartSessionError::Repository(RepositoryError::Conflict("dup".into())).into();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[tokio::test]
    async fn test_oversized_cart_is_bad_request() {
        let (status, body) = render(CartError::TooLarge.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Cart total is too large!");
    }
}
