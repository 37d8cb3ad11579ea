//! API error types and their HTTP mapping
//!
//! Every failure leaves the gateway as `{ "error": { "code", "message" } }`
//! with a machine readable code, whatever layer produced it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Machine readable error codes surfaced to API clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    Unauthorized,
    InsufficientScope,
    RateLimitExceeded,
    ValidationError,
    MissingProviderCredential,
    ProviderError,
    NotFound,
    Conflict,
    InternalError,
}

/// Error detail carried in the response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: ApiErrorCode,
    pub message: String,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// API error with HTTP status code
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    code,
                    message: message.into(),
                },
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, ApiErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            ApiErrorCode::InsufficientScope,
            message,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorCode::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorCode::Conflict, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            ApiErrorCode::RateLimitExceeded,
            message,
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorCode::InternalError,
            message,
        )
    }

    pub fn code(&self) -> ApiErrorCode {
        self.response.error.code
    }

    pub fn message(&self) -> &str {
        &self.response.error.message
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, AxumJson(self.response)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error.message)
    }
}

impl std::error::Error for ApiError {}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match &error {
            DomainError::NotFound { .. } => Self::not_found(error.to_string()),
            DomainError::Validation { .. } | DomainError::InvalidId { .. } => {
                Self::bad_request(error.to_string())
            }
            DomainError::Unauthorized { .. } => Self::unauthorized(error.to_string()),
            DomainError::RateLimitExceeded { .. } => Self::rate_limited(error.to_string()),
            DomainError::InsufficientScope { .. } => Self::forbidden(error.to_string()),
            DomainError::Credential { message } => Self::new(
                StatusCode::BAD_REQUEST,
                ApiErrorCode::MissingProviderCredential,
                message.clone(),
            ),
            DomainError::Provider { .. } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorCode::ProviderError,
                error.to_string(),
            ),
            DomainError::Conflict { .. } => Self::conflict(error.to_string()),
            // Internal details stay in the logs
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                tracing::error!(error = %error, "Internal error surfaced to API");
                Self::internal("Internal server error")
            }
        }
    }
}
