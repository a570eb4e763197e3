use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::EmbedError;

/// Errors returned by the embed HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error("Missing token query parameter")]
    MissingToken,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::MissingToken => (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() })),
            Self::Embed(EmbedError::InvalidToken(reason)) => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Invalid or expired embed token", "reason": reason.as_str() }),
            ),
            Self::Embed(EmbedError::JobNotFound(_)) => {
                (StatusCode::NOT_FOUND, json!({ "error": self.to_string() }))
            }
            Self::Embed(EmbedError::EmptyJobId) => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            Self::Embed(
                EmbedError::Signing(_) | EmbedError::ExpiryOutOfRange(_) | EmbedError::Store(_),
            ) => {
                tracing::error!(error = %self, "Embed internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
