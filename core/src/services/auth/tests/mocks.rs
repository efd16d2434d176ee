//! Mock SMS sender for authentication service tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::services::sms::{SmsDelivery, SmsError, SmsSender};

/// A delivered message captured by the mock
#[derive(Debug, Clone)]
pub struct SentSms {
    pub phone: String,
    pub code: String,
    pub ttl_secs: i64,
}

/// SMS sender that records every delivery and can be told to fail
pub struct RecordingSms {
    sent: Mutex<Vec<SentSms>>,
    fail_next: AtomicBool,
}

impl RecordingSms {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    /// Make the next send fail with a transport error
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// The most recent code sent to a phone
    pub fn last_code(&self, phone: &str) -> Option<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.phone == phone)
            .map(|s| s.code.clone())
    }

    /// Number of messages delivered
    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        ttl_secs: i64,
    ) -> Result<SmsDelivery, SmsError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SmsError::Transport {
                reason: "simulated outage".to_string(),
            });
        }

        self.sent.lock().unwrap().push(SentSms {
            phone: phone.to_string(),
            code: code.to_string(),
            ttl_secs,
        });

        Ok(SmsDelivery {
            message_id: Some(format!("mock-{}", self.sent_count())),
        })
    }
}
