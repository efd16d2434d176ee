//! Route handlers and shared request helpers.

pub mod admin;
pub mod auth;
pub mod health;

use actix_web::HttpRequest;
use std::sync::Arc;

use sv_core::domain::value_objects::ClientMetadata;
use sv_core::repositories::{TokenRepository, UserRepository};
use sv_core::services::auth::AuthService;
use sv_core::services::token::TokenCodec;

/// Shared application state handed to the handlers
pub struct AppState<U, T, C>
where
    U: UserRepository,
    T: TokenRepository,
    C: TokenCodec,
{
    pub auth_service: Arc<AuthService<U, T, C>>,
}

/// Client metadata (user-agent, IP) for token issuance audit hashes
pub fn client_metadata(req: &HttpRequest) -> ClientMetadata {
    ClientMetadata::new(extract_user_agent(req), extract_client_ip(req))
}

/// Extract the client IP, honoring reverse-proxy headers
fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    if let Some(forwarded_for) = req.headers().get("X-Forwarded-For") {
        if let Ok(forwarded_str) = forwarded_for.to_str() {
            if let Some(ip) = forwarded_str.split(',').next() {
                return Some(ip.trim().to_string());
            }
        }
    }

    if let Some(real_ip) = req.headers().get("X-Real-IP") {
        if let Ok(ip_str) = real_ip.to_str() {
            return Some(ip_str.to_string());
        }
    }

    req.connection_info()
        .peer_addr()
        .map(|addr| addr.to_string())
}

fn extract_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("User-Agent")
        .and_then(|ua| ua.to_str().ok())
        .map(|s| s.to_string())
}
