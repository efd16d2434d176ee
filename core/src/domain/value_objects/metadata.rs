//! Client metadata captured at token issuance.

use sha2::{Digest, Sha256};

/// Raw client metadata supplied by the router collaborator.
///
/// The metadata is hashed before it reaches storage; the raw values never
/// leave the request scope. Missing values hash a fixed placeholder so the
/// stored digests are always present and fixed-length.
#[derive(Debug, Clone, Default)]
pub struct ClientMetadata {
    /// Client user-agent header, if present
    pub user_agent: Option<String>,

    /// Client IP address, if known
    pub ip: Option<String>,
}

impl ClientMetadata {
    /// Creates metadata from optional request values
    pub fn new(user_agent: Option<String>, ip: Option<String>) -> Self {
        Self { user_agent, ip }
    }

    /// SHA-256 digest of the user-agent, hex-encoded
    pub fn user_agent_hash(&self) -> String {
        sha256_hex(self.user_agent.as_deref().unwrap_or("unknown"))
    }

    /// SHA-256 digest of the IP address, hex-encoded
    pub fn ip_hash(&self) -> String {
        sha256_hex(self.ip.as_deref().unwrap_or("unknown"))
    }
}

fn sha256_hex(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashes_are_hex_digests() {
        let metadata = ClientMetadata::new(
            Some("Mozilla/5.0".to_string()),
            Some("203.0.113.7".to_string()),
        );

        let ua = metadata.user_agent_hash();
        let ip = metadata.ip_hash();
        assert_eq!(ua.len(), 64);
        assert_eq!(ip.len(), 64);
        assert!(ua.chars().all(|c| c.is_ascii_hexdigit()));
        // Digests must not contain the raw values
        assert!(!ua.contains("Mozilla"));
        assert!(!ip.contains("203.0.113.7"));
    }

    #[test]
    fn test_missing_values_fall_back() {
        let metadata = ClientMetadata::default();
        assert_eq!(metadata.user_agent_hash(), sha256_hex("unknown"));
        assert_eq!(metadata.ip_hash(), sha256_hex("unknown"));
    }

    #[test]
    fn test_hashing_is_deterministic() {
        let a = ClientMetadata::new(Some("agent".to_string()), None);
        let b = ClientMetadata::new(Some("agent".to_string()), None);
        assert_eq!(a.user_agent_hash(), b.user_agent_hash());
    }
}
