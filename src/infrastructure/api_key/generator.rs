//! API key generation
//!
//! Generates cryptographically secure API keys. The plaintext key leaves
//! this module exactly once; only the hash and a lookup prefix are stored.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// How many characters of the random portion go into the lookup prefix
const PREFIX_RANDOM_CHARS: usize = 8;

/// Result of generating a new API key
#[derive(Debug, Clone)]
pub struct GeneratedApiKey {
    /// The full API key (only shown once at creation)
    pub key: String,
    /// The lookup prefix stored alongside the hash
    pub prefix: String,
    /// The hashed key for storage
    pub hash: String,
}

/// Generator for secure API keys
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Type prefix for all generated keys (e.g. "mk_live_", "mk_test_")
    prefix: String,
    /// Number of random bytes behind each key
    key_bytes: usize,
}

impl ApiKeyGenerator {
    /// Create a new API key generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: 32,
        }
    }

    /// Generator for production keys
    pub fn production() -> Self {
        Self::new("mk_live_")
    }

    /// Generator for test keys
    pub fn test() -> Self {
        Self::new("mk_test_")
    }

    /// Generate a new API key
    pub fn generate(&self) -> GeneratedApiKey {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        let encoded = URL_SAFE_NO_PAD.encode(&random_bytes);
        self.assemble(&encoded)
    }

    /// Build a key from a known secret portion (for deterministic tests)
    pub fn from_secret(&self, secret: &str) -> GeneratedApiKey {
        self.assemble(secret)
    }

    fn assemble(&self, random_portion: &str) -> GeneratedApiKey {
        let key = format!("{}{}", self.prefix, random_portion);
        let prefix_len = PREFIX_RANDOM_CHARS.min(random_portion.len());
        let prefix = format!("{}{}", self.prefix, &random_portion[..prefix_len]);
        let hash = self.hash_key(&key);

        GeneratedApiKey { key, prefix, hash }
    }

    /// Hash an API key for storage
    pub fn hash_key(&self, key: &str) -> String {
        let digest = Sha256::digest(key.as_bytes());
        format!("sha256${}", URL_SAFE_NO_PAD.encode(digest))
    }

    /// Verify an API key against a stored hash
    pub fn verify_key(&self, key: &str, stored_hash: &str) -> bool {
        constant_time_compare(&self.hash_key(key), stored_hash)
    }

    /// Extract the lookup prefix from a presented key.
    ///
    /// Keys look like "mk_live_<random>"; the lookup prefix is the type
    /// prefix plus the first 8 random characters.
    pub fn extract_prefix(key: &str) -> Option<&str> {
        let first = key.find('_')?;
        match key[first + 1..].find('_') {
            Some(second) => {
                let type_prefix_end = first + 1 + second + 1;
                let end = (type_prefix_end + PREFIX_RANDOM_CHARS).min(key.len());
                Some(&key[..end])
            }
            None => Some(&key[..first + 1]),
        }
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::production()
    }
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.as_bytes()
        .iter()
        .zip(b.as_bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
