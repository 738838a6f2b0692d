//! Resolved network profile and signing key material.

use std::fmt;

use url::Url;

/// A single private key. Never logged or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw hex key, with or without `0x` prefix.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// Ordered signing keys for a profile. The first key signs deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials(Vec<SigningKey>);

impl Credentials {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self(keys)
    }

    pub fn primary(&self) -> Option<&SigningKey> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The active network: endpoint, chain and signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: String,
    pub rpc_url: Url,
    pub chain_id: u64,
    pub credentials: Credentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_keys() {
        let profile = NetworkProfile {
            name: "testnet".into(),
            rpc_url: "https://testnet-rpc.monad.xyz".parse().unwrap(),
            chain_id: 10143,
            credentials: Credentials::new(vec![SigningKey::new("0xdeadbeef")]),
        };
        let debug = format!("{:?}", profile);
        assert!(!debug.contains("deadbeef"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_primary_is_first_key() {
        let creds = Credentials::new(vec![SigningKey::new("a"), SigningKey::new("b")]);
        assert_eq!(creds.primary().unwrap().expose(), "a");
        assert_eq!(creds.len(), 2);
    }
}
