//! Error mapping from domain errors to HTTP responses.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use serde::Serialize;

use sv_core::errors::{AuthError, DomainError, OtpError, TokenError};

/// API-level error wrapping a domain error
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub DomainError);

/// JSON body rendered for every failed request
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    success: bool,
    /// Stable machine-readable code
    error: &'a str,
    /// Human-readable message
    message: String,
    /// Seconds to wait before retrying, for throttled requests
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<i64>,
    timestamp: chrono::DateTime<Utc>,
}

impl ApiError {
    /// Build a validation error from request-level input problems
    pub fn validation(message: impl Into<String>) -> Self {
        Self(DomainError::Validation {
            message: message.into(),
        })
    }

    fn code(&self) -> &'static str {
        match &self.0 {
            DomainError::Otp(e) => e.code(),
            DomainError::Token(e) => e.code(),
            DomainError::Auth(e) => e.code(),
            DomainError::Validation { .. } => "VALIDATION_ERROR",
            DomainError::Database { .. } | DomainError::Internal { .. } => "INTERNAL",
        }
    }

    fn public_message(&self) -> String {
        match &self.0 {
            // Storage and internal details stay out of responses
            DomainError::Database { .. } | DomainError::Internal { .. } => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    fn retry_after(&self) -> Option<i64> {
        match &self.0 {
            DomainError::Otp(OtpError::ResendTooSoon { retry_after_secs }) => {
                Some(*retry_after_secs)
            }
            _ => None,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Otp(OtpError::ResendTooSoon { .. }) => StatusCode::TOO_MANY_REQUESTS,
            DomainError::Otp(_) => StatusCode::BAD_REQUEST,
            DomainError::Token(TokenError::InvalidToken) => StatusCode::UNAUTHORIZED,
            DomainError::Token(TokenError::GenerationFailed) => StatusCode::INTERNAL_SERVER_ERROR,
            DomainError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            DomainError::Auth(AuthError::Unauthorized) => StatusCode::UNAUTHORIZED,
            DomainError::Auth(AuthError::Forbidden) => StatusCode::FORBIDDEN,
            DomainError::Auth(AuthError::InvalidPhoneFormat) => StatusCode::BAD_REQUEST,
            DomainError::Auth(AuthError::SmsDeliveryFailed) => StatusCode::BAD_GATEWAY,
            DomainError::Validation { .. } => StatusCode::BAD_REQUEST,
            DomainError::Database { .. } | DomainError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self.0, "Request failed with server error");
        }

        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            error: self.code(),
            message: self.public_message(),
            retry_after: self.retry_after(),
            timestamp: Utc::now(),
        })
    }
}
