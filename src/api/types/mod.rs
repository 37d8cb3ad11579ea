//! API request/response types shared by the HTTP handlers

pub mod api_keys;
pub mod error;
pub mod generate;
pub mod json;
pub mod webhooks;

pub use api_keys::{ApiKeyResponse, CreateApiKeyRequest, CreatedApiKeyResponse, UpdateApiKeyRequest};
pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use generate::{
    GenerateRequest, GenerateResponse, GenerationRecordResponse, ListQuery, UsageInfo,
};
pub use json::Json;
pub use webhooks::{
    CreateWebhookRequest, DeliveryAttemptResponse, UpdateWebhookRequest, WebhookIdQuery,
    WebhookResponse,
};
