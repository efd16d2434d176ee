//! Configuration for the token service

/// Token lifetimes and the server-side hash salt
#[derive(Debug, Clone)]
pub struct TokenServiceConfig {
    /// Access token lifetime in minutes
    pub access_ttl_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_ttl_days: i64,

    /// Static salt mixed into the refresh-secret hash before storage
    pub refresh_token_salt: String,
}

impl TokenServiceConfig {
    /// Access token lifetime in seconds, as returned to clients
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl_minutes * 60
    }
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            access_ttl_minutes: 15,
            refresh_ttl_days: 30,
            refresh_token_salt: "development-salt-change-me".to_string(),
        }
    }
}
