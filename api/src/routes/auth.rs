//! Customer authentication routes: OTP request/verify, session refresh,
//! and logout.

use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use sv_core::repositories::{TokenRepository, UserRepository};
use sv_core::services::token::TokenCodec;
use sv_shared::types::ApiResponse;

use crate::dto::auth::{
    LogoutRequest, LogoutResponse, RefreshRequest, SendCodeRequest, SendCodeResponse,
    VerifyCodeRequest,
};
use crate::error::ApiError;
use crate::middleware::CustomerAuth;
use crate::routes::{client_metadata, AppState};

/// Handler for POST /api/v1/auth/send-code
///
/// Issues a one-time code and hands it to the SMS provider. The response
/// carries only the TTLs; the code travels exclusively by SMS.
pub async fn send_code<U, T, C>(
    state: web::Data<AppState<U, T, C>>,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    request.validate().map_err(|e| ApiError::validation(e.to_string()))?;

    let receipt = state.auth_service.request_code(&request.phone).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(SendCodeResponse {
        ttl_seconds: receipt.ttl_secs,
        resend_in_seconds: receipt.resend_in_secs,
    })))
}

/// Handler for POST /api/v1/auth/verify-code
///
/// Verifies the submitted code (consuming it on success) and returns the
/// user plus a fresh token pair.
pub async fn verify_code<U, T, C>(
    req: HttpRequest,
    state: web::Data<AppState<U, T, C>>,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    request.validate().map_err(|e| ApiError::validation(e.to_string()))?;

    let metadata = client_metadata(&req);
    let request = request.into_inner();
    let response = state
        .auth_service
        .verify_code(&request.phone, &request.code, request.name, &metadata)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token. Failures are terminal for the presented token:
/// the client must re-login rather than retry.
pub async fn refresh<U, T, C>(
    req: HttpRequest,
    state: web::Data<AppState<U, T, C>>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    let metadata = client_metadata(&req);
    let pair = state
        .auth_service
        .refresh_session(&request.refresh_token, &metadata)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(pair)))
}

/// Handler for POST /api/v1/auth/logout (protected)
///
/// Revokes the presented refresh token. Idempotent.
pub async fn logout<U, T, C>(
    _auth: CustomerAuth,
    state: web::Data<AppState<U, T, C>>,
    request: web::Json<LogoutRequest>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    state.auth_service.logout(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LogoutResponse { revoked: None })))
}

/// Handler for POST /api/v1/auth/logout-all (protected)
///
/// Revokes every outstanding refresh token of the calling user.
pub async fn logout_all<U, T, C>(
    auth: CustomerAuth,
    state: web::Data<AppState<U, T, C>>,
) -> Result<HttpResponse, ApiError>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    C: TokenCodec + 'static,
{
    let revoked = state.auth_service.logout_all(auth.0.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(LogoutResponse {
        revoked: Some(revoked),
    })))
}
