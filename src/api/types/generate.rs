//! Generation endpoint request and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::generation::{GenerationRecord, GenerationResult};
use crate::domain::rate_limit::RateLimitDecision;

/// Request body for `POST /v1/generate`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub prompt: String,
    pub provider: String,
    pub aspect_ratio: Option<String>,
    pub style: Option<String>,
    pub model: Option<String>,
    pub quality: Option<String>,
}

/// Response body for a successful generation
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub data: GenerationData,
    pub usage: UsageInfo,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationData {
    pub image_url: String,
    pub prompt: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    pub generation_time_ms: u64,
    pub cost_micros: u64,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Rate limit standing after the admitted request
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageInfo {
    pub rate_limit_remaining: u32,
    pub rate_limit_reset: DateTime<Utc>,
}

impl GenerateResponse {
    pub fn from_result(
        request: &GenerateRequest,
        provider: &str,
        result: GenerationResult,
        decision: &RateLimitDecision,
    ) -> Self {
        Self {
            data: GenerationData {
                image_url: result.image_url,
                prompt: request.prompt.clone(),
                provider: provider.to_string(),
                aspect_ratio: request.aspect_ratio.clone(),
                generation_time_ms: result.generation_time_ms,
                cost_micros: result.cost_micros,
                metadata: result.metadata,
            },
            usage: UsageInfo {
                rate_limit_remaining: decision.remaining,
                rate_limit_reset: decision.resets_at,
            },
        }
    }
}

/// Query parameters for history listings
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

/// One entry in the account's generation history
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecordResponse {
    pub id: String,
    pub prompt: String,
    pub provider: String,
    pub image_url: String,
    pub generation_time_ms: u64,
    pub cost_micros: u64,
    pub created_at: DateTime<Utc>,
}

impl From<GenerationRecord> for GenerationRecordResponse {
    fn from(record: GenerationRecord) -> Self {
        Self {
            id: record.id,
            prompt: record.prompt,
            provider: record.provider.as_str().to_string(),
            image_url: record.image_url,
            generation_time_ms: record.generation_time_ms,
            cost_micros: record.cost_micros,
            created_at: record.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_uses_camel_case() {
        let request: GenerateRequest = serde_json::from_str(
            r#"{"prompt": "a fox", "provider": "openai", "aspectRatio": "16:9"}"#,
        )
        .unwrap();

        assert_eq!(request.prompt, "a fox");
        assert_eq!(request.aspect_ratio.as_deref(), Some("16:9"));
        assert!(request.style.is_none());
    }

    #[test]
    fn test_response_shape() {
        let response = GenerateResponse {
            data: GenerationData {
                image_url: "https://images.example.com/a.png".to_string(),
                prompt: "a fox".to_string(),
                provider: "openai".to_string(),
                aspect_ratio: None,
                generation_time_ms: 1500,
                cost_micros: 40000,
                metadata: HashMap::new(),
            },
            usage: UsageInfo {
                rate_limit_remaining: 59,
                rate_limit_reset: Utc::now(),
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["data"]["imageUrl"], "https://images.example.com/a.png");
        assert_eq!(json["usage"]["rateLimitRemaining"], 59);
        assert!(json["data"].get("aspectRatio").is_none());
    }
}
