use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::store::StoreError;

/// ApiError
///
/// The single error taxonomy every handler maps into. Each variant carries the
/// client-facing message; the HTTP status is fixed per variant:
/// - `Conflict` -> 400 (duplicate email at signup, duplicate universe title/chapter)
/// - `Unauthorized` -> 401 (bad credentials; missing/expired/malformed session token)
/// - `NotFound` -> 404 (lookup-key misses)
/// - `Validation` -> 422 (field-level checks the body-parsing layer cannot express)
/// - `Store`/`Hash`/`Token` -> 500 with an opaque body; the cause is logged at the
///   response boundary and never retried or leaked to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("token issuance failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// ErrorResponse
///
/// The JSON body shape for every non-2xx response produced by `ApiError`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, (*msg).to_string()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, (*msg).to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, (*msg).to_string()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, (*msg).to_string()),
            ApiError::Store(e) => {
                tracing::error!("storage failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Hash(e) => {
                tracing::error!("password hashing failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Token(e) => {
                tracing::error!("token issuance failure: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
