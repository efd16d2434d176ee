//! In-memory per-phone ledger of pending one-time codes.

use constant_time_eq::constant_time_eq;
use rand::rngs::OsRng;
use rand::Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use sv_shared::utils::phone::mask_phone;

use crate::domain::entities::otp::{
    OtpEntry, CODE_TTL_SECS, MAX_ATTEMPTS, RESEND_COOLDOWN_SECS,
};
use crate::errors::{DomainResult, OtpError};
use crate::services::clock::Clock;

/// A freshly issued code with the TTLs the caller needs for messaging.
///
/// The code itself must only travel toward the SMS sender; it is never
/// logged and never returned to an untrusted caller.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    /// The 6-digit code
    pub code: String,

    /// Code lifetime in seconds
    pub ttl_secs: i64,

    /// Seconds until the next code may be requested
    pub resend_in_secs: i64,
}

/// Tracks pending codes per phone with expiry, attempt counting, and resend
/// throttling.
///
/// Entries live only in process memory; losing them on restart just forces
/// re-issuance. Both operations take the write lock for their whole
/// check-then-mutate sequence, so concurrent calls for the same phone
/// serialize and cannot double-pass the cooldown check or consume another
/// entry's attempt budget.
pub struct OtpLedger {
    entries: RwLock<HashMap<String, OtpEntry>>,
    clock: Arc<dyn Clock>,
}

impl OtpLedger {
    /// Create a ledger reading time from the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Issue a code for a phone number.
    ///
    /// Refuses with `ResendTooSoon` while a previous entry's cooldown holds;
    /// otherwise any prior entry is overwritten and its attempt count reset.
    pub async fn request_code(&self, phone: &str) -> DomainResult<IssuedCode> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        if let Some(existing) = entries.get(phone) {
            if existing.resend_blocked(now) {
                let retry_after_secs = existing.resend_wait_secs(now);
                tracing::warn!(
                    phone = %mask_phone(phone),
                    retry_after_secs,
                    event = "otp_resend_throttled",
                    "Code requested before the resend cooldown elapsed"
                );
                return Err(OtpError::ResendTooSoon { retry_after_secs }.into());
            }
        }

        let code = generate_code();
        entries.insert(phone.to_string(), OtpEntry::new(code.clone(), now));

        tracing::info!(
            phone = %mask_phone(phone),
            event = "otp_generated",
            "Issued new verification code"
        );

        Ok(IssuedCode {
            code,
            ttl_secs: CODE_TTL_SECS,
            resend_in_secs: RESEND_COOLDOWN_SECS,
        })
    }

    /// Verify a submitted code.
    ///
    /// Success consumes the entry, so exactly one verify can ever succeed per
    /// issuance. A mismatch costs one attempt and leaves the entry in place;
    /// the attempt cap is checked before an attempt is consumed.
    pub async fn verify_code(&self, phone: &str, submitted: &str) -> DomainResult<()> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;

        let entry = match entries.get_mut(phone) {
            Some(entry) => entry,
            None => return Err(OtpError::NotFound.into()),
        };

        if entry.is_expired(now) {
            entries.remove(phone);
            tracing::info!(
                phone = %mask_phone(phone),
                event = "otp_expired",
                "Verification attempted against an expired code"
            );
            return Err(OtpError::Expired.into());
        }

        if entry.attempts_exhausted() {
            tracing::warn!(
                phone = %mask_phone(phone),
                max_attempts = MAX_ATTEMPTS,
                event = "otp_attempts_exhausted",
                "Verification refused, attempt budget spent"
            );
            return Err(OtpError::AttemptsExceeded.into());
        }

        entry.attempts += 1;

        if constant_time_eq(entry.code.as_bytes(), submitted.as_bytes()) {
            entries.remove(phone);
            tracing::info!(
                phone = %mask_phone(phone),
                event = "otp_verified",
                "Verification code accepted"
            );
            Ok(())
        } else {
            tracing::warn!(
                phone = %mask_phone(phone),
                attempts = entry.attempts,
                event = "otp_mismatch",
                "Verification code rejected"
            );
            Err(OtpError::CodeMismatch.into())
        }
    }

    /// Drop any pending entry for a phone (e.g., after SMS delivery failed)
    pub async fn invalidate(&self, phone: &str) {
        self.entries.write().await.remove(phone);
    }
}

/// Uniformly random 6-digit code, leading zeros preserved
fn generate_code() -> String {
    let code: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:06}", code)
}

#[cfg(test)]
mod codegen_tests {
    use super::*;

    #[test]
    fn test_generated_code_format() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_codes_vary() {
        let codes: std::collections::HashSet<String> =
            (0..100).map(|_| generate_code()).collect();
        assert!(codes.len() > 1);
    }
}
