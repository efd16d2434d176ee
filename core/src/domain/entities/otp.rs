//! One-time password entry for SMS-based login.

use chrono::{DateTime, Duration, Utc};

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Code lifetime (5 minutes)
pub const CODE_TTL_SECS: i64 = 5 * 60;

/// Minimum wait between two codes for the same phone (60 seconds)
pub const RESEND_COOLDOWN_SECS: i64 = 60;

/// Maximum verification attempts per issued code
pub const MAX_ATTEMPTS: u32 = 5;

/// A pending one-time code for a single phone number.
///
/// At most one entry is live per phone; issuing a new code overwrites the
/// previous entry. All time comparisons take an explicit `now` so the ledger
/// stays deterministic under a substituted clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    /// The 6-digit code, leading zeros preserved
    pub code: String,

    /// Instant after which the code is unusable
    pub expires_at: DateTime<Utc>,

    /// Verification attempts consumed against this entry
    pub attempts: u32,

    /// Instant before which a new code for this phone is refused
    pub resend_available_at: DateTime<Utc>,
}

impl OtpEntry {
    /// Creates a fresh entry issued at `now`
    pub fn new(code: String, now: DateTime<Utc>) -> Self {
        Self {
            code,
            expires_at: now + Duration::seconds(CODE_TTL_SECS),
            attempts: 0,
            resend_available_at: now + Duration::seconds(RESEND_COOLDOWN_SECS),
        }
    }

    /// Whether the code has expired as of `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Whether a resend is still refused as of `now`
    pub fn resend_blocked(&self, now: DateTime<Utc>) -> bool {
        now < self.resend_available_at
    }

    /// Seconds until a resend becomes available, zero if already allowed
    pub fn resend_wait_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.resend_available_at - now).num_seconds().max(0)
    }

    /// Whether the attempt budget is spent
    pub fn attempts_exhausted(&self) -> bool {
        self.attempts >= MAX_ATTEMPTS
    }
}
