//! Authorization gate: bearer-token verification and capability tiers.
//!
//! The gate itself never rejects a request. It verifies the bearer header
//! when one is present and attaches an [`AuthContext`] on success; a missing,
//! malformed, or invalid token simply leaves the request anonymous. Tier
//! enforcement happens in the extractors: public handlers take no extractor,
//! protected handlers take [`CustomerAuth`], admin handlers take
//! [`AdminAuth`] — those produce the Unauthorized/Forbidden errors.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use sv_core::domain::entities::user::UserRole;
use sv_core::errors::{AuthError, DomainError, DomainResult};
use sv_core::repositories::{TokenRepository, UserRepository};
use sv_core::services::token::{TokenCodec, TokenService, VerifiedAccess};

use crate::error::ApiError;

/// Dyn-friendly access-token verification, so the gate does not carry the
/// token service's generics
pub trait AccessVerifier: Send + Sync {
    /// Verify an access token; pure check, no storage access
    fn verify_access(&self, token: &str) -> DomainResult<VerifiedAccess>;
}

impl<R, U, C> AccessVerifier for TokenService<R, U, C>
where
    R: TokenRepository,
    U: UserRepository,
    C: TokenCodec,
{
    fn verify_access(&self, token: &str) -> DomainResult<VerifiedAccess> {
        TokenService::verify_access(self, token)
    }
}

/// Verified identity attached to a request
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    /// Subject user ID
    pub user_id: Uuid,
    /// Role embedded in the access token
    pub role: UserRole,
}

/// Middleware factory for the authorization gate
pub struct AuthGate {
    verifier: Arc<dyn AccessVerifier>,
}

impl AuthGate {
    /// Create a gate backed by the given verifier
    pub fn new(verifier: Arc<dyn AccessVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
            verifier: self.verifier.clone(),
        }))
    }
}

/// Authorization gate middleware service
pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn AccessVerifier>,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(token) = extract_bearer_token(&req) {
            match self.verifier.verify_access(&token) {
                Ok(access) => {
                    req.extensions_mut().insert(AuthContext {
                        user_id: access.user_id,
                        role: access.role,
                    });
                }
                Err(_) => {
                    // Degrade to anonymous; the tier extractors produce the
                    // user-visible error if the handler needs an identity
                    tracing::debug!(
                        path = req.path(),
                        event = "bearer_rejected",
                        "Invalid bearer token, continuing as anonymous"
                    );
                }
            }
        }

        self.service.call(req)
    }
}

/// Extracts the bearer token from the Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.to_string())
}

/// Extractor for protected endpoints: any authenticated role
pub struct CustomerAuth(pub AuthContext);

impl FromRequest for CustomerAuth {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .copied()
            .map(CustomerAuth)
            .ok_or(ApiError(DomainError::Auth(AuthError::Unauthorized)));
        ready(result)
    }
}

/// Extractor for admin endpoints: requires an authenticated ADMIN.
///
/// Anything less — anonymous or a non-admin identity — is Forbidden.
pub struct AdminAuth(pub AuthContext);

impl FromRequest for AdminAuth {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = match req.extensions().get::<AuthContext>().copied() {
            Some(ctx) if ctx.role == UserRole::Admin => Ok(AdminAuth(ctx)),
            _ => Err(ApiError(DomainError::Auth(AuthError::Forbidden))),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req), Some("token_123".to_string()));

        let req_no_scheme = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "token_123"))
            .to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_scheme), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }
}
