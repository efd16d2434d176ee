//! SMS delivery port.
//!
//! Delivery is an external capability; this trait is the only place a
//! generated code crosses the subsystem boundary.

use async_trait::async_trait;
use thiserror::Error;

/// Delivery errors reported by a provider
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("provider rejected the message: {reason}")]
    Rejected { reason: String },

    #[error("transport failure: {reason}")]
    Transport { reason: String },
}

/// Successful delivery report
#[derive(Debug, Clone)]
pub struct SmsDelivery {
    /// Provider-assigned message identifier, if any
    pub message_id: Option<String>,
}

/// Outbound SMS capability
#[async_trait]
pub trait SmsSender: Send + Sync {
    /// Deliver a verification code to a phone number.
    ///
    /// `ttl_secs` is the code's lifetime, for inclusion in the message text.
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        ttl_secs: i64,
    ) -> Result<SmsDelivery, SmsError>;
}
