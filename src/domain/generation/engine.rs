//! Generation engine trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::{GenerationRequest, GenerationResult};
use crate::domain::credentials::ProviderCredential;
use crate::domain::DomainError;

/// Boundary to the upstream image generation service
#[async_trait]
pub trait GenerationEngine: Send + Sync + Debug {
    /// Run a single generation against the provider named in the request.
    ///
    /// Implementations bound the call in time and map provider failures to
    /// `DomainError::Provider` with a message safe to surface to callers.
    async fn generate(
        &self,
        request: &GenerationRequest,
        credential: &ProviderCredential,
    ) -> Result<GenerationResult, DomainError>;
}
