//! Generation dispatch endpoint
//!
//! Admission happens in a fixed order: authentication, rate limiting,
//! scope check, request validation. Only then does the request reach the
//! engine. The engine call runs in a spawned task so a client that
//! disconnects mid-generation still gets billed, recorded and announced.

use axum::extract::{Query, State};
use serde_json::json;
use tracing::{info, warn};

use crate::api::middleware::{require_scope, RequireApiKey};
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, GenerateRequest, GenerateResponse, GenerationRecordResponse, Json, ListQuery,
};
use crate::domain::api_key::{ApiKey, Scope};
use crate::domain::event::{DomainEvent, EventType};
use crate::domain::generation::{GenerationRecord, GenerationRequest, GenerationResult, Provider};
use crate::domain::DomainError;

const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 200;

/// `POST /v1/generate`
pub async fn create_generation(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    // Every authenticated request consumes a window slot, even ones that
    // fail later checks
    let decision = state
        .rate_limiter
        .admit(api_key.id().as_str(), api_key.rate_limit())
        .await;

    if !decision.allowed {
        info!(
            key_id = %api_key.id(),
            limit = decision.limit,
            "Request rejected by rate limiter"
        );
        return Err(ApiError::rate_limited(format!(
            "Rate limit of {} requests per minute exceeded. Window resets at {}",
            decision.limit,
            decision.resets_at.to_rfc3339()
        )));
    }

    require_scope(&api_key, Scope::Generate)?;

    let provider = Provider::parse(&request.provider)?;
    let mut generation = GenerationRequest::new(&request.prompt, provider)?;
    if let Some(aspect_ratio) = &request.aspect_ratio {
        generation = generation.with_aspect_ratio(aspect_ratio);
    }
    if let Some(style) = &request.style {
        generation = generation.with_style(style);
    }
    if let Some(model) = &request.model {
        generation = generation.with_model(model);
    }
    if let Some(quality) = &request.quality {
        generation = generation.with_quality(quality);
    }

    // Detached from the request future: a dropped connection must not
    // cancel a generation that is already being paid for
    let worker_state = state.clone();
    let worker_key = api_key.clone();
    let handle =
        tokio::spawn(async move { run_generation(worker_state, worker_key, generation).await });

    let result = handle
        .await
        .map_err(|e| {
            warn!(error = %e, "Generation task did not complete");
            ApiError::internal("Internal server error")
        })?
        .map_err(ApiError::from)?;

    Ok(Json(GenerateResponse::from_result(
        &request,
        provider.as_str(),
        result,
        &decision,
    )))
}

/// Resolve the credential, call the engine, record and announce the outcome
async fn run_generation(
    state: AppState,
    api_key: ApiKey,
    request: GenerationRequest,
) -> Result<GenerationResult, DomainError> {
    let provider = request.provider();

    let credential = state
        .credential_provider
        .get_credential(provider)
        .await?
        .ok_or_else(|| {
            DomainError::credential(format!(
                "No credential configured for provider '{}'",
                provider
            ))
        })?;

    match state.engine.generate(&request, &credential).await {
        Ok(result) => {
            let record = GenerationRecord::new(
                api_key.account_id().clone(),
                api_key.id().clone(),
                request.prompt(),
                provider,
                &result.image_url,
                result.generation_time_ms,
                result.cost_micros,
            );
            let generation_id = record.id.clone();

            if let Err(e) = state.history.append(record).await {
                warn!(error = %e, "Failed to record generation history");
            }

            state.publisher.publish(DomainEvent::new(
                EventType::GenerationCompleted,
                json!({
                    "generation_id": generation_id,
                    "account_id": api_key.account_id().as_str(),
                    "provider": provider.as_str(),
                    "image_url": result.image_url,
                }),
                "gateway",
            ));

            info!(
                key_id = %api_key.id(),
                provider = %provider,
                generation_time_ms = result.generation_time_ms,
                "Generation completed"
            );
            Ok(result)
        }
        Err(e) => {
            state.publisher.publish(DomainEvent::new(
                EventType::GenerationFailed,
                json!({
                    "account_id": api_key.account_id().as_str(),
                    "provider": provider.as_str(),
                    "error": e.to_string(),
                }),
                "gateway",
            ));
            Err(e)
        }
    }
}

/// `GET /v1/generations`
pub async fn list_generations(
    State(state): State<AppState>,
    RequireApiKey(api_key): RequireApiKey,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<GenerationRecordResponse>>, ApiError> {
    require_scope(&api_key, Scope::Generate)?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);

    let records = state
        .history
        .list_by_account(api_key.account_id(), limit)
        .await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}
