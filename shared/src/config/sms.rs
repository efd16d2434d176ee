//! SMS delivery provider configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Which SMS delivery provider to wire up at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmsProviderKind {
    /// Log-only provider for development and tests
    Mock,
    /// SMS.ru HTTP gateway
    SmsRu,
}

/// SMS delivery configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Selected provider
    pub provider: SmsProviderKind,

    /// SMS.ru API key; required when the provider is `SmsRu`
    pub smsru_api_key: Option<String>,
}

impl SmsConfig {
    /// Create from environment variables; defaults to the mock provider
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider = match std::env::var("SMS_PROVIDER").as_deref() {
            Ok("smsru") => SmsProviderKind::SmsRu,
            Ok("mock") | Err(_) => SmsProviderKind::Mock,
            Ok(other) => {
                return Err(ConfigError::InvalidVar {
                    name: "SMS_PROVIDER",
                    reason: format!("unknown provider {:?}, expected \"mock\" or \"smsru\"", other),
                })
            }
        };

        let smsru_api_key = std::env::var("SMSRU_API_KEY").ok();
        if provider == SmsProviderKind::SmsRu && smsru_api_key.is_none() {
            return Err(ConfigError::MissingVar { name: "SMSRU_API_KEY" });
        }

        Ok(Self {
            provider,
            smsru_api_key,
        })
    }
}
