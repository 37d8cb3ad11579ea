//! Generation request and result types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::DomainError;

/// Supported upstream image generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Stability,
    Replicate,
}

impl Provider {
    /// All supported providers
    pub fn all() -> Vec<Self> {
        vec![Self::OpenAi, Self::Stability, Self::Replicate]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Stability => "stability",
            Self::Replicate => "replicate",
        }
    }

    /// Parse a provider name as supplied by API callers
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        match name {
            "openai" => Ok(Self::OpenAi),
            "stability" => Ok(Self::Stability),
            "replicate" => Ok(Self::Replicate),
            other => Err(DomainError::validation(format!(
                "Unknown provider '{}'. Supported providers: openai, stability, replicate",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const MAX_PROMPT_LENGTH: usize = 4000;

/// A validated request for a single image generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    prompt: String,
    provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<String>,
}

impl GenerationRequest {
    /// Create a request, validating the prompt
    pub fn new(prompt: impl Into<String>, provider: Provider) -> Result<Self, DomainError> {
        let prompt = prompt.into();

        if prompt.trim().is_empty() {
            return Err(DomainError::validation("Prompt cannot be empty"));
        }

        if prompt.len() > MAX_PROMPT_LENGTH {
            return Err(DomainError::validation(format!(
                "Prompt exceeds maximum length of {} characters",
                MAX_PROMPT_LENGTH
            )));
        }

        Ok(Self {
            prompt,
            provider,
            aspect_ratio: None,
            style: None,
            model: None,
            quality: None,
        })
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(aspect_ratio.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_quality(mut self, quality: impl Into<String>) -> Self {
        self.quality = Some(quality.into());
        self
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    pub fn aspect_ratio(&self) -> Option<&str> {
        self.aspect_ratio.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn quality(&self) -> Option<&str> {
        self.quality.as_deref()
    }
}

/// Result of a completed generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Where the generated image can be fetched
    pub image_url: String,
    /// Wall time spent at the provider
    pub generation_time_ms: u64,
    /// Cost in millionths of the billing unit
    pub cost_micros: u64,
    /// Provider specific extras (seed, revised prompt, etc.)
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}
