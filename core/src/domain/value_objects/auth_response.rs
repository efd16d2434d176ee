//! Authentication response value object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserRole};

/// Public view of a user, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier
    pub id: Uuid,

    /// Phone number in E.164 format
    pub phone: String,

    /// Display name, if set
    pub name: Option<String>,

    /// Role of the user
    pub role: UserRole,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            phone: user.phone.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}

/// Response returned after a successful login (OTP verify or admin password)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: UserSummary,

    /// Signed access token
    pub access_token: String,

    /// Signed refresh token
    pub refresh_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Advisory: the submitted password equals the configured default and
    /// should be changed. Never set for OTP logins.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub must_change_password: Option<bool>,
}

impl AuthResponse {
    /// Builds a response from a user and a freshly issued token pair
    pub fn new(user: &User, tokens: TokenPair) -> Self {
        Self {
            user: UserSummary::from(user),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            must_change_password: None,
        }
    }

    /// Attaches the default-password advisory flag
    pub fn with_password_advisory(mut self, must_change: bool) -> Self {
        self.must_change_password = Some(must_change);
        self
    }
}
