//! Muse Gateway
//!
//! A developer-facing API gateway for image generation providers:
//! - API key authentication with scoped capabilities
//! - Fixed-window rate limiting per key
//! - Dispatch to an upstream generation engine with per-provider credentials
//! - Webhook subscriptions with HMAC-signed event deliveries

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use api::state::AppState;
use domain::account::AccountId;
use domain::api_key::{ApiKeyId, Scope};
use domain::credentials::CredentialProvider;
use domain::generation::GenerationEngine;
use domain::rate_limit::RateLimiter;
use domain::webhook::{DeliveryLog, WebhookRepository};
use infrastructure::api_key::{ApiKeyService, FixedWindowRateLimiter, InMemoryApiKeyRepository};
use infrastructure::credentials::EnvCredentialProvider;
use infrastructure::generation::{HttpGenerationEngine, InMemoryGenerationHistory};
use infrastructure::webhook::{
    EventPublisher, InMemoryDeliveryLog, InMemoryWebhookRepository, WebhookService,
};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let rate_limiter: Arc<dyn RateLimiter> = Arc::new(FixedWindowRateLimiter::with_window(
        Duration::from_secs(config.rate_limit.window_seconds),
    ));

    let webhook_repo: Arc<dyn WebhookRepository> = Arc::new(InMemoryWebhookRepository::new());
    let delivery_log: Arc<dyn DeliveryLog> = Arc::new(InMemoryDeliveryLog::new());

    let mut publisher = EventPublisher::new(webhook_repo.clone(), delivery_log.clone())
        .with_delivery_timeout(Duration::from_secs(config.webhook.delivery_timeout_seconds));
    if let Some(secret) = &config.webhook.signing_secret {
        publisher = publisher.with_default_secret(secret);
    }

    let api_key_service = ApiKeyService::new(
        Arc::new(InMemoryApiKeyRepository::new()),
        rate_limiter.clone(),
    )
    .with_publisher(publisher.clone());

    // A known secret lets operators bootstrap the first key with full
    // scopes; everything else goes through /admin/keys
    if let Ok(secret) = std::env::var("BOOTSTRAP_API_KEY_SECRET") {
        create_bootstrap_key(&api_key_service, &secret).await?;
    }

    let credential_provider: Arc<dyn CredentialProvider> =
        Arc::new(EnvCredentialProvider::with_defaults());
    info!(
        source = credential_provider.source_name(),
        "Credential provider initialized"
    );

    let engine: Arc<dyn GenerationEngine> = Arc::new(
        HttpGenerationEngine::new(&config.engine.base_url)
            .with_timeout(Duration::from_secs(config.engine.timeout_seconds)),
    );

    Ok(AppState::new(
        Arc::new(api_key_service),
        Arc::new(WebhookService::new(webhook_repo, delivery_log)),
        rate_limiter,
        credential_provider,
        engine,
        Arc::new(InMemoryGenerationHistory::new()),
        publisher,
    ))
}

async fn create_bootstrap_key(
    api_key_service: &ApiKeyService<InMemoryApiKeyRepository>,
    secret: &str,
) -> anyhow::Result<()> {
    let issued = api_key_service
        .issue_with_secret(
            ApiKeyId::new("bootstrap")?,
            AccountId::new("admin")?,
            "Bootstrap Key",
            secret,
            Scope::all().into_iter().collect(),
            None,
        )
        .await?;

    info!(
        key_id = %issued.api_key.id(),
        key_prefix = %issued.api_key.key_prefix(),
        "Bootstrap API key created"
    );
    Ok(())
}
