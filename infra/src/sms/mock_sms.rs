//! Log-only SMS provider for development and tests.

use async_trait::async_trait;

use sv_core::services::sms::{SmsDelivery, SmsError, SmsSender};
use sv_shared::utils::phone::mask_phone;

/// Provider that reports success without sending anything.
///
/// Logs a masked delivery event; the code itself is deliberately absent
/// from the log record.
#[derive(Debug, Clone, Default)]
pub struct MockSms;

impl MockSms {
    /// Create a new mock provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SmsSender for MockSms {
    async fn send_code(
        &self,
        phone: &str,
        _code: &str,
        ttl_secs: i64,
    ) -> Result<SmsDelivery, SmsError> {
        tracing::info!(
            phone = %mask_phone(phone),
            ttl_secs,
            event = "sms_mock_delivery",
            "Mock SMS provider accepted verification code"
        );

        Ok(SmsDelivery { message_id: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_always_succeeds() {
        let sms = MockSms::new();
        let delivery = sms.send_code("+79991234567", "123456", 300).await.unwrap();
        assert!(delivery.message_id.is_none());
    }
}
