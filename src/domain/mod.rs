//! Domain layer - Core business logic and entities

pub mod account;
pub mod api_key;
pub mod credentials;
pub mod error;
pub mod event;
pub mod generation;
pub mod rate_limit;
pub mod webhook;

pub use account::{AccountId, AccountIdError};
pub use api_key::{ApiKey, ApiKeyId, ApiKeyRepository, ApiKeyValidationError, Scope};
pub use credentials::{CredentialProvider, ProviderCredential};
pub use error::DomainError;
pub use event::{DomainEvent, EventType};
pub use generation::{
    GenerationEngine, GenerationHistoryRepository, GenerationRecord, GenerationRequest,
    GenerationResult, Provider,
};
pub use rate_limit::{RateLimitDecision, RateLimiter};
pub use webhook::{
    DeliveryAttempt, DeliveryLog, WebhookId, WebhookRepository, WebhookSubscription,
};
