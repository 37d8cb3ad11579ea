//! API key infrastructure
//!
//! Secure key generation and hashing, the in-process fixed window rate
//! limiter, the in-memory repository and the key management service.

pub mod generator;
pub mod in_memory;
pub mod rate_limiter;
pub mod service;

pub use generator::{ApiKeyGenerator, GeneratedApiKey};
pub use in_memory::InMemoryApiKeyRepository;
pub use rate_limiter::FixedWindowRateLimiter;
pub use service::{ApiKeyService, IssuedApiKey};
