//! API key management request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::api_key::{ApiKey, Scope};

/// Request body for `POST /admin/keys`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub scopes: Vec<Scope>,
    pub rate_limit: Option<u32>,
}

/// Request body for `PATCH /admin/keys/{id}`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApiKeyRequest {
    pub scopes: Option<Vec<Scope>>,
    pub rate_limit: Option<u32>,
}

/// Key entity as returned to API clients; never carries the secret
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub id: String,
    pub name: String,
    pub key_prefix: String,
    pub scopes: Vec<Scope>,
    pub rate_limit: u32,
    pub usage_count: u64,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&ApiKey> for ApiKeyResponse {
    fn from(key: &ApiKey) -> Self {
        let mut scopes: Vec<Scope> = key.scopes().iter().copied().collect();
        scopes.sort_by_key(|s| s.as_str());

        Self {
            id: key.id().as_str().to_string(),
            name: key.name().to_string(),
            key_prefix: key.key_prefix().to_string(),
            scopes,
            rate_limit: key.rate_limit(),
            usage_count: key.usage_count(),
            active: key.is_active(),
            last_used_at: key.last_used_at(),
            created_at: key.created_at(),
        }
    }
}

/// Response for a freshly issued key; the only place the secret appears
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApiKeyResponse {
    pub key: ApiKeyResponse,
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::AccountId;
    use crate::domain::api_key::ApiKeyId;

    #[test]
    fn test_response_omits_secret_hash() {
        let key = ApiKey::new(
            ApiKeyId::new("key-1").unwrap(),
            AccountId::new("acct-1").unwrap(),
            "Test Key",
            "sha256$supersecret",
            "mk_live_abcd1234",
        );

        let response = ApiKeyResponse::from(&key);
        let json = serde_json::to_string(&response).unwrap();

        assert!(!json.contains("supersecret"));
        assert!(json.contains("mk_live_abcd1234"));
        assert!(json.contains("\"keyPrefix\""));
    }

    #[test]
    fn test_scopes_sorted_for_stable_output() {
        let key = ApiKey::new(
            ApiKeyId::new("key-1").unwrap(),
            AccountId::new("acct-1").unwrap(),
            "Test Key",
            "sha256$hash",
            "mk_live_abcd1234",
        )
        .with_scopes([Scope::WebhooksManage, Scope::Generate, Scope::KeysManage]);

        let response = ApiKeyResponse::from(&key);
        assert_eq!(
            response.scopes,
            vec![Scope::Generate, Scope::KeysManage, Scope::WebhooksManage]
        );
    }
}
