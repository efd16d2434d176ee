//! Ledger behavior tests driven by a manual clock.

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::domain::entities::otp::{CODE_TTL_SECS, MAX_ATTEMPTS, RESEND_COOLDOWN_SECS};
use crate::errors::{DomainError, OtpError};
use crate::services::clock::ManualClock;
use crate::services::otp::OtpLedger;

const PHONE: &str = "+79991234567";

fn ledger_with_clock() -> (OtpLedger, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_at(Utc::now()));
    (OtpLedger::new(clock.clone()), clock)
}

fn otp_err(err: DomainError) -> OtpError {
    match err {
        DomainError::Otp(e) => e,
        other => panic!("expected an OTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_issued_code_shape() {
    let (ledger, _) = ledger_with_clock();
    let issued = ledger.request_code(PHONE).await.unwrap();

    assert_eq!(issued.code.len(), 6);
    assert_eq!(issued.ttl_secs, CODE_TTL_SECS);
    assert_eq!(issued.resend_in_secs, RESEND_COOLDOWN_SECS);
}

#[tokio::test]
async fn test_resend_within_cooldown_refused() {
    let (ledger, clock) = ledger_with_clock();
    ledger.request_code(PHONE).await.unwrap();

    let err = otp_err(ledger.request_code(PHONE).await.unwrap_err());
    match err {
        OtpError::ResendTooSoon { retry_after_secs } => {
            assert!(retry_after_secs > 0 && retry_after_secs <= RESEND_COOLDOWN_SECS);
        }
        other => panic!("expected ResendTooSoon, got {:?}", other),
    }

    // A different phone is unaffected
    ledger.request_code("+79990000001").await.unwrap();

    // After the cooldown the same phone can request again
    clock.advance(Duration::seconds(RESEND_COOLDOWN_SECS));
    ledger.request_code(PHONE).await.unwrap();
}

#[tokio::test]
async fn test_resend_overwrites_previous_code() {
    let (ledger, clock) = ledger_with_clock();
    let first = ledger.request_code(PHONE).await.unwrap();

    clock.advance(Duration::seconds(RESEND_COOLDOWN_SECS));
    let second = ledger.request_code(PHONE).await.unwrap();

    // The first code is dead even if it happens to differ from the second
    if first.code != second.code {
        assert_eq!(
            otp_err(ledger.verify_code(PHONE, &first.code).await.unwrap_err()),
            OtpError::CodeMismatch
        );
    }
    ledger.verify_code(PHONE, &second.code).await.unwrap();
}

#[tokio::test]
async fn test_verify_consumes_entry() {
    let (ledger, _) = ledger_with_clock();
    let issued = ledger.request_code(PHONE).await.unwrap();

    ledger.verify_code(PHONE, &issued.code).await.unwrap();

    // The same code cannot succeed twice for one issuance
    assert_eq!(
        otp_err(ledger.verify_code(PHONE, &issued.code).await.unwrap_err()),
        OtpError::NotFound
    );
}

#[tokio::test]
async fn test_verify_unknown_phone() {
    let (ledger, _) = ledger_with_clock();
    assert_eq!(
        otp_err(ledger.verify_code(PHONE, "123456").await.unwrap_err()),
        OtpError::NotFound
    );
}

#[tokio::test]
async fn test_mismatch_preserves_entry_until_cap() {
    let (ledger, _) = ledger_with_clock();
    let issued = ledger.request_code(PHONE).await.unwrap();
    let wrong = wrong_code(&issued.code);

    for _ in 0..MAX_ATTEMPTS {
        assert_eq!(
            otp_err(ledger.verify_code(PHONE, &wrong).await.unwrap_err()),
            OtpError::CodeMismatch
        );
    }

    // Budget spent: even the correct code is refused now
    assert_eq!(
        otp_err(ledger.verify_code(PHONE, &issued.code).await.unwrap_err()),
        OtpError::AttemptsExceeded
    );
}

#[tokio::test]
async fn test_correct_code_within_budget_succeeds() {
    let (ledger, _) = ledger_with_clock();
    let issued = ledger.request_code(PHONE).await.unwrap();
    let wrong = wrong_code(&issued.code);

    for _ in 0..MAX_ATTEMPTS - 1 {
        ledger.verify_code(PHONE, &wrong).await.unwrap_err();
    }
    ledger.verify_code(PHONE, &issued.code).await.unwrap();
}

#[tokio::test]
async fn test_expired_code_removed_and_cooldown_cleared() {
    let (ledger, clock) = ledger_with_clock();
    let issued = ledger.request_code(PHONE).await.unwrap();

    clock.advance(Duration::seconds(CODE_TTL_SECS + 1));

    assert_eq!(
        otp_err(ledger.verify_code(PHONE, &issued.code).await.unwrap_err()),
        OtpError::Expired
    );
    // Expiry detection deleted the entry, so a new request succeeds
    // immediately instead of tripping over a stale cooldown
    ledger.request_code(PHONE).await.unwrap();
}

#[tokio::test]
async fn test_invalidate_drops_entry() {
    let (ledger, _) = ledger_with_clock();
    let issued = ledger.request_code(PHONE).await.unwrap();

    ledger.invalidate(PHONE).await;

    assert_eq!(
        otp_err(ledger.verify_code(PHONE, &issued.code).await.unwrap_err()),
        OtpError::NotFound
    );
}

/// A code guaranteed to differ from `code`
fn wrong_code(code: &str) -> String {
    if code == "000000" {
        "000001".to_string()
    } else {
        "000000".to_string()
    }
}
