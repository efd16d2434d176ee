//! Domain-specific error types for session and identity operations.
//!
//! Token and credential failures are deliberately undifferentiated: a forged,
//! expired, revoked, or superseded refresh token all surface as the same
//! `InvalidToken`, and an unknown admin username reads the same as a wrong
//! password. OTP errors are safe to surface verbatim.

use thiserror::Error;

/// One-time password flow errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("a code was requested too recently, retry in {retry_after_secs}s")]
    ResendTooSoon { retry_after_secs: i64 },

    #[error("no pending code for this phone")]
    NotFound,

    #[error("verification code expired")]
    Expired,

    #[error("verification code does not match")]
    CodeMismatch,

    #[error("maximum verification attempts exceeded")]
    AttemptsExceeded,
}

/// Token verification and management errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    InvalidToken,

    #[error("token generation failed")]
    GenerationFailed,
}

/// Authentication and authorization errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid phone number format")]
    InvalidPhoneFormat,

    #[error("failed to deliver verification code")]
    SmsDeliveryFailed,

    #[error("authentication required")]
    Unauthorized,

    #[error("insufficient permissions")]
    Forbidden,
}

impl OtpError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            OtpError::ResendTooSoon { .. } => "RESEND_TOO_SOON",
            OtpError::NotFound => "OTP_NOT_FOUND",
            OtpError::Expired => "OTP_EXPIRED",
            OtpError::CodeMismatch => "OTP_MISMATCH",
            OtpError::AttemptsExceeded => "OTP_ATTEMPTS_EXCEEDED",
        }
    }
}

impl TokenError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TokenError::InvalidToken => "INVALID_TOKEN",
            TokenError::GenerationFailed => "TOKEN_GENERATION_FAILED",
        }
    }
}

impl AuthError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            AuthError::SmsDeliveryFailed => "SMS_FAILURE",
            AuthError::Unauthorized => "UNAUTHORIZED",
            AuthError::Forbidden => "FORBIDDEN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_error_codes() {
        assert_eq!(
            OtpError::ResendTooSoon { retry_after_secs: 42 }.code(),
            "RESEND_TOO_SOON"
        );
        assert_eq!(OtpError::AttemptsExceeded.code(), "OTP_ATTEMPTS_EXCEEDED");
    }

    #[test]
    fn test_token_error_is_opaque() {
        // The display string must not hint at why the token was rejected
        let message = TokenError::InvalidToken.to_string();
        assert_eq!(message, "invalid token");
        assert!(!message.contains("expired"));
        assert!(!message.contains("revoked"));
    }

    #[test]
    fn test_credential_error_is_opaque() {
        let message = AuthError::InvalidCredentials.to_string();
        assert!(!message.contains("user"));
        assert!(!message.contains("password"));
    }
}
