//! Administrator routes.

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use sv_core::repositories::{TokenRepository, UserRepository};
use sv_core::services::token::TokenCodec;
use sv_shared::types::ApiResponse;

use crate::dto::auth::{AdminLoginRequest, LogoutResponse};
use crate::error::ApiError;
use crate::middleware::AdminAuth;
use crate::routes::{client_metadata, AppState};

/// Handler for POST /api/v1/admin/login
///
/// Password login for administrators. The response carries the advisory
/// `must_change_password` flag when the default password is still in use.
pub async fn login<U, T, C>(
    req: HttpRequest,
    state: web::Data<AppState<U, T, C>>,
    request: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    request.validate().map_err(|e| ApiError::validation(e.to_string()))?;

    let metadata = client_metadata(&req);
    let response = state
        .auth_service
        .admin_login(&request.username, &request.password, &metadata)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Handler for POST /api/v1/admin/users/{id}/revoke-sessions (admin only)
///
/// Administrative bulk revoke: kills every outstanding refresh token of the
/// targeted user.
pub async fn revoke_user_sessions<U, T, C>(
    _auth: AdminAuth,
    state: web::Data<AppState<U, T, C>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    let user_id = path.into_inner();
    let revoked = state.auth_service.logout_all(user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LogoutResponse {
        revoked: Some(revoked),
    })))
}
