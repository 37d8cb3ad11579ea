//! API Key entity and related types

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_api_key_id, ApiKeyValidationError};
use crate::domain::account::AccountId;

/// API Key identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiKeyId(String);

impl ApiKeyId {
    /// Create a new ApiKeyId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ApiKeyValidationError> {
        let id = id.into();
        validate_api_key_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ApiKeyId {
    type Error = ApiKeyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiKeyId> for String {
    fn from(id: ApiKeyId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ApiKeyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability granted to an API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Invoke image generation
    Generate,
    /// Manage webhook subscriptions
    WebhooksManage,
    /// Manage API keys for the account
    KeysManage,
}

impl Scope {
    /// All known scopes
    pub fn all() -> Vec<Scope> {
        vec![Self::Generate, Self::WebhooksManage, Self::KeysManage]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::WebhooksManage => "webhooks_manage",
            Self::KeysManage => "keys_manage",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 60;

/// API Key entity
///
/// The plaintext secret exists only at generation time. Only its hash
/// (algorithm$digest) and a display prefix are stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    /// Unique identifier for the key
    id: ApiKeyId,
    /// Account that owns this key
    account_id: AccountId,
    /// Display name for the key
    name: String,
    /// Hashed secret, format: algorithm$hash (e.g. "sha256$...")
    secret_hash: String,
    /// Key prefix for identification and lookup (never the full secret)
    key_prefix: String,
    /// Scopes granted to this key
    scopes: HashSet<Scope>,
    /// Maximum admitted requests per minute
    rate_limit: u32,
    /// Total requests admitted through this key
    usage_count: u64,
    /// Whether the key can currently authenticate
    active: bool,
    /// Last time the key was used
    #[serde(skip_serializing_if = "Option::is_none")]
    last_used_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl ApiKey {
    /// Create a new active API key with the default scope set
    pub fn new(
        id: ApiKeyId,
        account_id: AccountId,
        name: impl Into<String>,
        secret_hash: impl Into<String>,
        key_prefix: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            account_id,
            name: name.into(),
            secret_hash: secret_hash.into(),
            key_prefix: key_prefix.into(),
            scopes: HashSet::from([Scope::Generate]),
            rate_limit: DEFAULT_RATE_LIMIT_PER_MINUTE,
            usage_count: 0,
            active: true,
            last_used_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set scopes
    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    /// Set the per-minute rate limit
    pub fn with_rate_limit(mut self, requests_per_minute: u32) -> Self {
        self.rate_limit = requests_per_minute;
        self
    }

    // Getters

    pub fn id(&self) -> &ApiKeyId {
        &self.id
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn scopes(&self) -> &HashSet<Scope> {
        &self.scopes
    }

    pub fn rate_limit(&self) -> u32 {
        self.rate_limit
    }

    pub fn usage_count(&self) -> u64 {
        self.usage_count
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check whether the key grants a scope
    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }

    // Mutators

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    /// Replace the scope set
    pub fn set_scopes(&mut self, scopes: impl IntoIterator<Item = Scope>) {
        self.scopes = scopes.into_iter().collect();
        self.touch();
    }

    /// Update the per-minute rate limit
    pub fn set_rate_limit(&mut self, requests_per_minute: u32) {
        self.rate_limit = requests_per_minute;
        self.touch();
    }

    /// Record an admitted request
    pub fn record_usage(&mut self) {
        self.usage_count += 1;
        self.last_used_at = Some(Utc::now());
    }

    /// Disable the key; it can no longer authenticate
    pub fn revoke(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Re-enable a revoked key
    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_api_key(id: &str, name: &str) -> ApiKey {
        let key_id = ApiKeyId::new(id).unwrap();
        let account_id = AccountId::new("acct-1").unwrap();
        ApiKey::new(key_id, account_id, name, "sha256$hash", "mk_live_abcd1234")
    }

    #[test]
    fn test_api_key_id_valid() {
        let id = ApiKeyId::new("my-api-key-1").unwrap();
        assert_eq!(id.as_str(), "my-api-key-1");
    }

    #[test]
    fn test_api_key_id_invalid() {
        assert!(ApiKeyId::new("").is_err());
        assert!(ApiKeyId::new("bad key").is_err());
    }

    #[test]
    fn test_new_key_defaults() {
        let key = create_test_api_key("key-1", "Test Key");
        assert!(key.is_active());
        assert!(key.has_scope(Scope::Generate));
        assert!(!key.has_scope(Scope::KeysManage));
        assert_eq!(key.rate_limit(), 60);
        assert_eq!(key.usage_count(), 0);
        assert!(key.last_used_at().is_none());
    }

    #[test]
    fn test_with_scopes() {
        let key = create_test_api_key("key-1", "Test Key")
            .with_scopes([Scope::Generate, Scope::WebhooksManage]);
        assert!(key.has_scope(Scope::WebhooksManage));
        assert!(!key.has_scope(Scope::KeysManage));
    }

    #[test]
    fn test_record_usage_increments_counter() {
        let mut key = create_test_api_key("key-1", "Test Key");
        key.record_usage();
        key.record_usage();
        assert_eq!(key.usage_count(), 2);
        assert!(key.last_used_at().is_some());
    }

    #[test]
    fn test_revoke_and_activate() {
        let mut key = create_test_api_key("key-1", "Test Key");
        key.revoke();
        assert!(!key.is_active());
        key.activate();
        assert!(key.is_active());
    }

    #[test]
    fn test_scope_serde_round_trip() {
        let json = serde_json::to_string(&Scope::WebhooksManage).unwrap();
        assert_eq!(json, "\"webhooks_manage\"");
        let scope: Scope = serde_json::from_str(&json).unwrap();
        assert_eq!(scope, Scope::WebhooksManage);
    }
}
