//! Auth endpoint DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendCodeRequest {
    /// Phone number in E.164 format (e.g., "+79991234567")
    #[validate(length(min = 8, max = 16))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeResponse {
    /// Code lifetime in seconds
    pub ttl_seconds: i64,
    /// Seconds until a new code may be requested
    pub resend_in_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeRequest {
    /// Phone number in E.164 format
    #[validate(length(min = 8, max = 16))]
    pub phone: String,

    /// 6-digit verification code
    #[validate(length(equal = 6))]
    pub code: String,

    /// Optional display name, stored on first login
    #[validate(length(max = 100))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,

    #[validate(length(min = 4, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub revoked: Option<usize>,
}
