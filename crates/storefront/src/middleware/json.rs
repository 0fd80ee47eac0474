//! JSON body extractor with validation errors.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Like [`axum::Json`], but a body that doesn't deserialize is an
/// [`AppError::Validation`], answered with 400 `{"message": ...}`.
///
/// Field types carry the invariants (`Price` rejects negatives), so a
/// payload that parses is already well-formed.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(error = %rejection.body_text(), "Rejected JSON payload");
            AppError::Validation(rejection.body_text())
        })?;
        Ok(Self(value))
    }
}
