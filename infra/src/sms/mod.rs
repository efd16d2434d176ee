//! SMS provider implementations for the core `SmsSender` port.

mod mock_sms;
mod smsru;

pub use mock_sms::MockSms;
pub use smsru::{SmsRuClient, SmsRuConfig};
