use std::sync::Arc;
use std::time::Duration;
use crate::cache::ExpiringCache;
use crate::clock::Clock;
use crate::config::{Args, RateLimitScope};
use crate::enrich::Enricher;
use crate::error::WorkerError;
use crate::models::{EnrichmentResponse, Provider, fingerprint};
use crate::rate_limit::AdmissionController;

// Upper bound keeps now + ttl far from Duration overflow
pub const MAX_CACHE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

// app's shared state

pub struct AppState {
    pub cache: ExpiringCache<EnrichmentResponse>,
    pub ttl: Duration, // how long cache will be valid
    pub admission: AdmissionController,
    pub scope: RateLimitScope,
    pub enricher: Enricher,
    pub producer_timeout: Duration,
}

impl AppState {
    pub fn new(args: &Args, enricher: Enricher, clock: Arc<dyn Clock>) -> Result<Self, WorkerError> {
        if args.cache_ttl == 0 || args.cache_ttl > MAX_CACHE_TTL_SECS {
            return Err(WorkerError::InvalidArgument(format!(
                "cache ttl must be between 1 and {} seconds, got {}",
                MAX_CACHE_TTL_SECS, args.cache_ttl
            )));
        }
        if args.producer_timeout == 0 {
            return Err(WorkerError::InvalidArgument(
                "producer timeout must be greater than zero".to_string(),
            ));
        }

        let admission = AdmissionController::new(
            args.requests_per_minute,
            Duration::from_secs(args.rate_window),
            clock.clone(),
        )?;

        Ok(Self {
            cache: ExpiringCache::new(clock),
            ttl: Duration::from_secs(args.cache_ttl),
            admission,
            scope: args.rate_limit_scope,
            enricher,
            producer_timeout: Duration::from_secs(args.producer_timeout),
        })
    }

    // Key the admission window is tracked under
    pub fn admission_key(&self, provider: Provider, match_id: &str) -> String {
        match self.scope {
            RateLimitScope::Match => fingerprint(provider, match_id),
            RateLimitScope::Provider => provider.slug().to_string(),
        }
    }
}
