//! Business services containing the session and identity logic.

pub mod auth;
pub mod clock;
pub mod credentials;
pub mod otp;
pub mod sms;
pub mod token;

// Re-export commonly used types
pub use auth::{AuthService, SendCodeReceipt};
pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::{hash_password, verify_password, CredentialVerifier, VerifiedCredentials};
pub use otp::{IssuedCode, OtpLedger};
pub use sms::{SmsDelivery, SmsError, SmsSender};
pub use token::{JwtCodec, TokenCodec, TokenService, TokenServiceConfig, VerifiedAccess};
