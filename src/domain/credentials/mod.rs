//! Provider credential management
//!
//! Upstream generation providers authenticate with per-provider API keys.
//! The gateway resolves them through the `CredentialProvider` trait so the
//! backing source (environment, secrets manager) stays swappable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::domain::generation::Provider;
use crate::domain::DomainError;

/// Credential for an upstream generation provider
#[derive(Debug, Clone)]
pub struct ProviderCredential {
    provider: Provider,
    api_key: String,
    additional_params: HashMap<String, String>,
    fetched_at: DateTime<Utc>,
}

impl ProviderCredential {
    pub fn new(provider: Provider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            additional_params: HashMap::new(),
            fetched_at: Utc::now(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_params.insert(key.into(), value.into());
        self
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn get_param(&self, key: &str) -> Option<&String> {
        self.additional_params.get(key)
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }
}

/// Trait for credential sources (ENV, secrets manager, etc.)
#[async_trait]
pub trait CredentialProvider: Send + Sync + Debug {
    /// Get the credential for a provider, `None` when not configured
    async fn get_credential(
        &self,
        provider: Provider,
    ) -> Result<Option<ProviderCredential>, DomainError>;

    /// Source name for logging
    fn source_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::RwLock;

    #[derive(Debug, Default)]
    pub struct MockCredentialProvider {
        credentials: RwLock<HashMap<Provider, ProviderCredential>>,
    }

    impl MockCredentialProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_credential(self, cred: ProviderCredential) -> Self {
            self.credentials
                .write()
                .unwrap()
                .insert(cred.provider(), cred);
            self
        }
    }

    #[async_trait]
    impl CredentialProvider for MockCredentialProvider {
        async fn get_credential(
            &self,
            provider: Provider,
        ) -> Result<Option<ProviderCredential>, DomainError> {
            Ok(self.credentials.read().unwrap().get(&provider).cloned())
        }

        fn source_name(&self) -> &'static str {
            "mock"
        }
    }
}
