use axum::{Json, extract::{Path, State}};
use std::sync::Arc;
use std::time::Instant;
use crate::error::{EnrichError, WorkerError};
use crate::metrics::{
    ADMISSION_KEYS, CACHE_HITS, CACHE_MISSES, CACHE_SIZE, PRODUCER_FAILURES, RATE_LIMITED_TOTAL,
    REQUEST_LATENCY, REQUEST_TOTAL,
};
use crate::models::{EnrichmentResponse, Provider, fingerprint};
use crate::state::AppState;

pub async fn enrich_fotmob_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<Json<EnrichmentResponse>, WorkerError> {
    enrich(&state, Provider::Fotmob, &match_id).await.map(Json)
}

pub async fn enrich_sofascore_handler(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<String>,
) -> Result<Json<EnrichmentResponse>, WorkerError> {
    enrich(&state, Provider::Sofascore, &match_id).await.map(Json)
}

async fn enrich(
    state: &AppState,
    provider: Provider,
    match_id: &str,
) -> Result<EnrichmentResponse, WorkerError> {
    REQUEST_TOTAL.inc();

    let admission_key = state.admission_key(provider, match_id);
    let admitted = state.admission.admit(&admission_key);
    ADMISSION_KEYS.set(state.admission.tracked_keys() as f64);
    if !admitted {
        RATE_LIMITED_TOTAL.inc();
        tracing::warn!(key = %admission_key, "rate limit exceeded");
        return Err(WorkerError::RateLimitExceeded { key: admission_key });
    }

    let start_time = Instant::now();
    let key = fingerprint(provider, match_id);
    let enricher = &state.enricher;

    let mut computed = false;
    let lookup = state.cache.get_or_compute(&key, state.ttl, || {
        computed = true;
        async move {
            enricher
                .enrich(provider, match_id)
                .await
                .map_err(WorkerError::from)
        }
    });

    // timeout drops the in-flight lookup, so nothing gets cached
    let outcome = match tokio::time::timeout(state.producer_timeout, lookup).await {
        Ok(result) => result,
        Err(_) => Err(WorkerError::Producer(EnrichError::Timeout(state.producer_timeout))),
    };

    if computed {
        CACHE_MISSES.inc();
    } else {
        CACHE_HITS.inc();
    }
    CACHE_SIZE.set(state.cache.len() as f64);
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match &outcome {
        Ok(_) => tracing::info!(%key, cached = !computed, "enrichment served"),
        Err(e) if e.is_producer_failure() => {
            PRODUCER_FAILURES.inc();
            tracing::warn!(%key, error = %e, "enrichment failed");
        }
        Err(e) => tracing::error!(%key, error = %e, "enrichment rejected"),
    }

    outcome
}
