//! SMS.ru delivery provider.
//!
//! Thin client over the `sms.ru/sms/send` JSON API. A delivery counts as
//! successful only when the gateway accepts the whole request and reports
//! per-message status 100.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use sv_core::services::sms::{SmsDelivery, SmsError, SmsSender};
use sv_shared::utils::phone::mask_phone;

const SEND_URL: &str = "https://sms.ru/sms/send";

/// Per-message delivery status meaning "accepted for delivery"
const STATUS_ACCEPTED: i32 = 100;

/// SMS.ru client configuration
#[derive(Debug, Clone)]
pub struct SmsRuConfig {
    /// API key (the `api_id` request parameter)
    pub api_key: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl SmsRuConfig {
    /// Create a configuration with the default timeout
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SmsRuResponse {
    status: String,
    #[serde(default)]
    status_text: Option<String>,
    #[serde(default)]
    sms: Option<HashMap<String, SmsRuMessage>>,
}

#[derive(Debug, Deserialize)]
struct SmsRuMessage {
    status_code: i32,
    #[serde(default)]
    status_text: Option<String>,
    #[serde(default)]
    sms_id: Option<String>,
}

/// SMS.ru implementation of the `SmsSender` port
pub struct SmsRuClient {
    client: reqwest::Client,
    config: SmsRuConfig,
}

impl SmsRuClient {
    /// Create a new client
    pub fn new(config: SmsRuConfig) -> Result<Self, SmsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SmsError::Transport {
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SmsSender for SmsRuClient {
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        ttl_secs: i64,
    ) -> Result<SmsDelivery, SmsError> {
        let message = format!(
            "Savora login code: {}. Valid for {} min.",
            code,
            ttl_secs / 60
        );

        let response = self
            .client
            .get(SEND_URL)
            .query(&[
                ("api_id", self.config.api_key.as_str()),
                ("to", phone),
                ("msg", message.as_str()),
                ("json", "1"),
            ])
            .send()
            .await
            .map_err(|e| SmsError::Transport {
                reason: e.to_string(),
            })?;

        let body: SmsRuResponse = response.json().await.map_err(|e| SmsError::Transport {
            reason: format!("malformed gateway response: {e}"),
        })?;

        if body.status != "OK" {
            return Err(SmsError::Rejected {
                reason: body
                    .status_text
                    .unwrap_or_else(|| "gateway reported an error".to_string()),
            });
        }

        let message = body
            .sms
            .as_ref()
            .and_then(|m| m.values().next())
            .ok_or_else(|| SmsError::Rejected {
                reason: "gateway response carried no message status".to_string(),
            })?;

        if message.status_code != STATUS_ACCEPTED {
            return Err(SmsError::Rejected {
                reason: message
                    .status_text
                    .clone()
                    .unwrap_or_else(|| format!("message status {}", message.status_code)),
            });
        }

        tracing::info!(
            phone = %mask_phone(phone),
            message_id = message.sms_id.as_deref().unwrap_or("-"),
            event = "sms_delivered",
            "SMS.ru accepted verification code"
        );

        Ok(SmsDelivery {
            message_id: message.sms_id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "status": "OK",
            "status_code": 100,
            "sms": {
                "+79991234567": {
                    "status": "OK",
                    "status_code": 100,
                    "sms_id": "000000-10000000"
                }
            }
        }"#;
        let parsed: SmsRuResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "OK");
        let message = parsed.sms.unwrap().remove("+79991234567").unwrap();
        assert_eq!(message.status_code, STATUS_ACCEPTED);
        assert_eq!(message.sms_id.as_deref(), Some("000000-10000000"));
    }

    #[test]
    fn test_error_response_parsing() {
        let json = r#"{"status": "ERROR", "status_code": 200, "status_text": "wrong api_id"}"#;
        let parsed: SmsRuResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.status, "ERROR");
        assert_eq!(parsed.status_text.as_deref(), Some("wrong api_id"));
        assert!(parsed.sms.is_none());
    }
}
