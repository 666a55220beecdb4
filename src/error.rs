//! Error taxonomy for recipe generation and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::upstream::UpstreamError;

/// Everything that can end a recipe request without a recipe.
#[derive(Error, Debug)]
pub enum RecipeError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Failed to parse recipe from completion")]
    Parse(String),

    #[error("Recipe generation was cancelled")]
    Cancelled,
}

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl RecipeError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecipeError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RecipeError::Upstream(UpstreamError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            RecipeError::Upstream(UpstreamError::PaymentRequired) => StatusCode::PAYMENT_REQUIRED,
            RecipeError::Upstream(_) | RecipeError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RecipeError::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RecipeError::InvalidRequest(_) => "invalid_request",
            RecipeError::Upstream(UpstreamError::MissingCredential(_))
            | RecipeError::Upstream(UpstreamError::ClientBuild(_)) => "configuration",
            RecipeError::Upstream(UpstreamError::RateLimited) => "rate_limited",
            RecipeError::Upstream(UpstreamError::PaymentRequired) => "payment_required",
            RecipeError::Upstream(UpstreamError::Timeout(_)) => "timeout",
            RecipeError::Upstream(_) => "upstream",
            RecipeError::Parse(_) => "parse",
            RecipeError::Cancelled => "cancelled",
        }
    }
}

impl IntoResponse for RecipeError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RecipeError::from(UpstreamError::RateLimited).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            RecipeError::from(UpstreamError::PaymentRequired).status_code(),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            RecipeError::from(UpstreamError::MissingCredential("KEY".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RecipeError::Parse("eof".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RecipeError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(RecipeError::Cancelled.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_messages_are_human_readable() {
        assert!(RecipeError::from(UpstreamError::RateLimited)
            .to_string()
            .starts_with("Rate limit"));
        assert!(RecipeError::from(UpstreamError::PaymentRequired)
            .to_string()
            .starts_with("Payment required"));
        assert_eq!(
            RecipeError::Parse("expected value at line 1".into()).to_string(),
            "Failed to parse recipe from completion"
        );
    }
}
