//! End-to-end authentication flow tests over the in-memory stack.

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::otp::RESEND_COOLDOWN_SECS;
use crate::domain::entities::user::{User, UserRole};
use crate::domain::value_objects::ClientMetadata;
use crate::errors::{AuthError, DomainError, OtpError, TokenError};
use crate::repositories::{MockTokenRepository, MockUserRepository};
use crate::services::auth::AuthService;
use crate::services::clock::ManualClock;
use crate::services::credentials::{hash_password, CredentialVerifier};
use crate::services::otp::OtpLedger;
use crate::services::token::{JwtCodec, TokenService, TokenServiceConfig};

use super::mocks::RecordingSms;

const PHONE: &str = "+79991234567";
const ACCESS_SECRET: &str = "test-access-secret-0123456789abcdef";
const REFRESH_SECRET: &str = "test-refresh-secret-0123456789abcdef";
const DEFAULT_ADMIN_PASSWORD: &str = "1234";

type TestAuthService = AuthService<MockUserRepository, MockTokenRepository, JwtCodec>;

struct Harness {
    service: TestAuthService,
    sms: Arc<RecordingSms>,
    clock: Arc<ManualClock>,
}

async fn harness() -> Harness {
    harness_with_users(MockUserRepository::new()).await
}

async fn harness_with_users(users: MockUserRepository) -> Harness {
    let users = Arc::new(users);
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    let sms = Arc::new(RecordingSms::new());

    let token_service = Arc::new(TokenService::new(
        Arc::new(MockTokenRepository::new()),
        users.clone(),
        JwtCodec::new(ACCESS_SECRET, REFRESH_SECRET),
        TokenServiceConfig {
            refresh_token_salt: "test-salt-0123456789".to_string(),
            ..Default::default()
        },
    ));

    let service = AuthService::new(
        users.clone(),
        Arc::new(OtpLedger::new(clock.clone())),
        token_service,
        CredentialVerifier::new(users, DEFAULT_ADMIN_PASSWORD.to_string()),
        sms.clone(),
    );

    Harness { service, sms, clock }
}

fn metadata() -> ClientMetadata {
    ClientMetadata::new(Some("test-agent".to_string()), Some("203.0.113.9".to_string()))
}

fn seeded_admin(password: &str) -> User {
    let mut admin = User::new_customer("admin".to_string(), Some("Admin".to_string()));
    admin.role = UserRole::Admin;
    admin.password_hash = Some(hash_password(password).unwrap());
    admin
}

#[tokio::test]
async fn test_full_customer_login_and_rotation() {
    let h = harness().await;

    // Request a code; it goes out by SMS and never appears in the receipt
    let receipt = h.service.request_code(PHONE).await.unwrap();
    assert_eq!(receipt.ttl_secs, 300);
    assert_eq!(receipt.resend_in_secs, 60);
    let code = h.sms.last_code(PHONE).unwrap();

    // Verify it: a customer account appears and a pair is issued
    let response = h
        .service
        .verify_code(PHONE, &code, Some("Ivan".to_string()), &metadata())
        .await
        .unwrap();
    assert_eq!(response.user.phone, PHONE);
    assert_eq!(response.user.role, UserRole::Customer);
    assert_eq!(response.user.name.as_deref(), Some("Ivan"));
    assert!(response.must_change_password.is_none());

    // Rotate: new pair, different refresh token
    let pair2 = h
        .service
        .refresh_session(&response.refresh_token, &metadata())
        .await
        .unwrap();
    assert_ne!(pair2.refresh_token, response.refresh_token);

    // The original refresh token is single-use
    let err = h
        .service
        .refresh_session(&response.refresh_token, &metadata())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
}

#[tokio::test]
async fn test_invalid_phone_rejected_before_ledger() {
    let h = harness().await;
    let err = h.service.request_code("not-a-phone").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidPhoneFormat)));
    assert_eq!(h.sms.sent_count(), 0);
}

#[tokio::test]
async fn test_resend_cooldown_enforced_through_facade() {
    let h = harness().await;
    h.service.request_code(PHONE).await.unwrap();

    let err = h.service.request_code(PHONE).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Otp(OtpError::ResendTooSoon { .. })
    ));

    h.clock.advance(Duration::seconds(RESEND_COOLDOWN_SECS));
    h.service.request_code(PHONE).await.unwrap();
}

#[tokio::test]
async fn test_sms_failure_invalidates_entry() {
    let h = harness().await;

    h.sms.fail_next();
    let err = h.service.request_code(PHONE).await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::SmsDeliveryFailed)));

    // The failed issuance left no cooldown behind: an immediate retry works
    h.service.request_code(PHONE).await.unwrap();
}

#[tokio::test]
async fn test_wrong_code_creates_no_user() {
    let h = harness().await;
    h.service.request_code(PHONE).await.unwrap();
    let code = h.sms.last_code(PHONE).unwrap();
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let err = h
        .service
        .verify_code(PHONE, wrong, None, &metadata())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Otp(OtpError::CodeMismatch)));

    // Still verifiable with the right code afterwards
    let response = h
        .service
        .verify_code(PHONE, &code, None, &metadata())
        .await
        .unwrap();
    assert_eq!(response.user.phone, PHONE);
}

#[tokio::test]
async fn test_repeat_login_updates_existing_user() {
    let h = harness().await;

    h.service.request_code(PHONE).await.unwrap();
    let code = h.sms.last_code(PHONE).unwrap();
    let first = h
        .service
        .verify_code(PHONE, &code, None, &metadata())
        .await
        .unwrap();

    h.clock.advance(Duration::seconds(RESEND_COOLDOWN_SECS));
    h.service.request_code(PHONE).await.unwrap();
    let code = h.sms.last_code(PHONE).unwrap();
    let second = h
        .service
        .verify_code(PHONE, &code, Some("Maria".to_string()), &metadata())
        .await
        .unwrap();

    // Same account, refreshed name
    assert_eq!(second.user.id, first.user.id);
    assert_eq!(second.user.name.as_deref(), Some("Maria"));
}

#[tokio::test]
async fn test_admin_login_with_default_password_advisory() {
    let h = harness_with_users(
        MockUserRepository::with_user(seeded_admin(DEFAULT_ADMIN_PASSWORD)).await,
    )
    .await;

    let response = h
        .service
        .admin_login("admin", DEFAULT_ADMIN_PASSWORD, &metadata())
        .await
        .unwrap();

    assert_eq!(response.user.role, UserRole::Admin);
    assert_eq!(response.must_change_password, Some(true));
}

#[tokio::test]
async fn test_admin_login_wrong_password() {
    let h = harness_with_users(
        MockUserRepository::with_user(seeded_admin(DEFAULT_ADMIN_PASSWORD)).await,
    )
    .await;

    let err = h
        .service
        .admin_login("admin", "wrong", &metadata())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_admin_login_with_own_password_no_advisory() {
    let h = harness_with_users(
        MockUserRepository::with_user(seeded_admin("a-proper-password")).await,
    )
    .await;

    let response = h
        .service
        .admin_login("admin", "a-proper-password", &metadata())
        .await
        .unwrap();
    assert_eq!(response.must_change_password, Some(false));
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let h = harness().await;
    h.service.request_code(PHONE).await.unwrap();
    let code = h.sms.last_code(PHONE).unwrap();
    let response = h
        .service
        .verify_code(PHONE, &code, None, &metadata())
        .await
        .unwrap();

    h.service.logout(&response.refresh_token).await.unwrap();

    let err = h
        .service
        .refresh_session(&response.refresh_token, &metadata())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));

    // Logging out twice is fine
    h.service.logout(&response.refresh_token).await.unwrap();
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let h = harness().await;

    h.service.request_code(PHONE).await.unwrap();
    let code = h.sms.last_code(PHONE).unwrap();
    let first = h
        .service
        .verify_code(PHONE, &code, None, &metadata())
        .await
        .unwrap();

    h.clock.advance(Duration::seconds(RESEND_COOLDOWN_SECS));
    h.service.request_code(PHONE).await.unwrap();
    let code = h.sms.last_code(PHONE).unwrap();
    let second = h
        .service
        .verify_code(PHONE, &code, None, &metadata())
        .await
        .unwrap();

    let revoked = h.service.logout_all(first.user.id).await.unwrap();
    assert_eq!(revoked, 2);

    for token in [&first.refresh_token, &second.refresh_token] {
        let err = h
            .service
            .refresh_session(token, &metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Token(TokenError::InvalidToken)));
    }
}
