//! Error body returned by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Machine-readable error code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    MissingInput,
    InvalidJson,
    PayloadTooLarge,
    NoProviderAvailable,
    RateLimited,
    PaymentRequired,
    MalformedProviderResponse,
    InternalError,
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MissingInput => "missing_input",
            Self::InvalidJson => "invalid_json",
            Self::PayloadTooLarge => "payload_too_large",
            Self::NoProviderAvailable => "no_provider_available",
            Self::RateLimited => "rate_limited",
            Self::PaymentRequired => "payment_required",
            Self::MalformedProviderResponse => "malformed_provider_response",
            Self::InternalError => "internal_error",
        };
        write!(f, "{}", s)
    }
}

/// `{error, code, raw?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: ApiErrorCode,
    /// Completion text that failed to parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
                code,
                raw: None,
            },
        }
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.response.raw = Some(raw.into());
        self
    }

    /// Drop the offending completion text from the body
    pub fn without_raw(mut self) -> Self {
        self.response.raw = None;
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::MissingInput, message)
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorCode::InvalidJson, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorCode::PayloadTooLarge,
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

    fn no_provider(message: String, upstream_status: Option<u16>) -> Self {
        match upstream_status {
            Some(429) => Self::new(
                StatusCode::TOO_MANY_REQUESTS,
                ApiErrorCode::RateLimited,
                message,
            ),
            Some(402) => Self::new(
                StatusCode::PAYMENT_REQUIRED,
                ApiErrorCode::PaymentRequired,
                message,
            ),
            _ => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorCode::NoProviderAvailable,
                message,
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MissingInput { message } => Self::bad_request(message),
            DomainError::NoProviderAvailable {
                message,
                upstream_status,
            } => Self::no_provider(message, upstream_status),
            DomainError::MalformedProviderResponse { message, raw } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorCode::MalformedProviderResponse,
                message,
            )
            .with_raw(raw),
            other => {
                tracing::error!(error = %other, "Unhandled error reached the API layer");
                Self::internal("Internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.response.code, self.response.error)
    }
}

impl std::error::Error for ApiError {}
