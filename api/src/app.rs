//! Route table and application wiring helpers.

use actix_web::{web, HttpResponse};

use sv_core::repositories::{TokenRepository, UserRepository};
use sv_core::services::token::TokenCodec;

use crate::routes::{admin, auth, health};

/// Register every route of the API.
///
/// Tier policy: `/auth/send-code`, `/auth/verify-code`, `/auth/refresh`, and
/// `/admin/login` are public; `/auth/logout` and `/auth/logout-all` require
/// any authenticated user; `/admin/users/...` requires an ADMIN. The tiers
/// are enforced by the handlers' extractors — the [`AuthGate`] middleware
/// only attaches identity.
///
/// [`AuthGate`]: crate::middleware::AuthGate
pub fn configure_routes<U, T, C>(cfg: &mut web::ServiceConfig)
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/send-code", web::post().to(auth::send_code::<U, T, C>))
                        .route("/verify-code", web::post().to(auth::verify_code::<U, T, C>))
                        .route("/refresh", web::post().to(auth::refresh::<U, T, C>))
                        .route("/logout", web::post().to(auth::logout::<U, T, C>))
                        .route("/logout-all", web::post().to(auth::logout_all::<U, T, C>)),
                )
                .service(
                    web::scope("/admin")
                        .route("/login", web::post().to(admin::login::<U, T, C>))
                        .route(
                            "/users/{id}/revoke-sessions",
                            web::post().to(admin::revoke_user_sessions::<U, T, C>),
                        ),
                ),
        );
}

/// Default handler for unmatched routes
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "error": "NOT_FOUND",
        "message": "The requested resource was not found"
    }))
}
