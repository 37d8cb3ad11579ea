//! Environment-backed credential provider

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::credentials::{CredentialProvider, ProviderCredential};
use crate::domain::generation::Provider;
use crate::domain::DomainError;

/// Resolves provider credentials from environment variables
#[derive(Debug)]
pub struct EnvCredentialProvider {
    mappings: HashMap<Provider, String>,
}

impl EnvCredentialProvider {
    /// Provider with no mappings
    pub fn new() -> Self {
        Self {
            mappings: HashMap::new(),
        }
    }

    /// Provider with the standard variable names
    pub fn with_defaults() -> Self {
        let mut provider = Self::new();
        provider.add_mapping(Provider::OpenAi, "OPENAI_API_KEY");
        provider.add_mapping(Provider::Stability, "STABILITY_API_KEY");
        provider.add_mapping(Provider::Replicate, "REPLICATE_API_TOKEN");
        provider
    }

    /// Map a provider to an environment variable
    pub fn add_mapping(&mut self, provider: Provider, env_var: impl Into<String>) {
        self.mappings.insert(provider, env_var.into());
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_credential(
        &self,
        provider: Provider,
    ) -> Result<Option<ProviderCredential>, DomainError> {
        let Some(env_var) = self.mappings.get(&provider) else {
            return Ok(None);
        };

        match std::env::var(env_var) {
            Ok(value) if !value.is_empty() => {
                debug!(provider = %provider, env_var = %env_var, "Resolved provider credential");
                Ok(Some(ProviderCredential::new(provider, value)))
            }
            _ => Ok(None),
        }
    }

    fn source_name(&self) -> &'static str {
        "env"
    }
}
