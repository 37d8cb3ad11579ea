//! HTTP client for the generation engine service
//!
//! The gateway does not run generation itself; it forwards admitted
//! requests to the engine service and maps its failures to sanitized
//! provider errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::domain::credentials::ProviderCredential;
use crate::domain::generation::{GenerationEngine, GenerationRequest, GenerationResult};
use crate::domain::DomainError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Serialize)]
struct EngineRequest<'a> {
    prompt: &'a str,
    provider: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EngineResponse {
    image_url: String,
    generation_time_ms: u64,
    cost_micros: u64,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
}

/// Engine backed by an HTTP generation service
#[derive(Debug)]
pub struct HttpGenerationEngine {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpGenerationEngine {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each generation call in time
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl GenerationEngine for HttpGenerationEngine {
    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: &ProviderCredential,
    ) -> Result<GenerationResult, DomainError> {
        let provider = request.provider();
        let url = format!("{}/v1/generations", self.base_url);

        let body = EngineRequest {
            prompt: request.prompt(),
            provider: provider.as_str(),
            aspect_ratio: request.aspect_ratio(),
            style: request.style(),
            model: request.model(),
            quality: request.quality(),
        };

        debug!(provider = %provider, "Dispatching generation to engine");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .bearer_auth(credential.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(provider = %provider, error = %e, "Generation request failed");
                if e.is_timeout() {
                    DomainError::provider(provider.as_str(), "Generation timed out")
                } else {
                    DomainError::provider(provider.as_str(), "Generation service unreachable")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(provider = %provider, status = %status, "Engine returned an error status");
            return Err(DomainError::provider(
                provider.as_str(),
                format!("Generation failed with status {}", status.as_u16()),
            ));
        }

        let parsed: EngineResponse = response.json().await.map_err(|e| {
            warn!(provider = %provider, error = %e, "Engine response was not parseable");
            DomainError::provider(provider.as_str(), "Malformed response from generation service")
        })?;

        Ok(GenerationResult {
            image_url: parsed.image_url,
            generation_time_ms: parsed.generation_time_ms,
            cost_micros: parsed.cost_micros,
            metadata: parsed.metadata,
        })
    }
}
