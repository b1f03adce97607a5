use std::sync::Arc;
use tokio::time::{Duration, interval};
use crate::clock::Clock;
use crate::metrics::{ADMISSION_KEYS, CACHE_SIZE};
use crate::state::AppState;

// One pass: expired cache entries and empty admission windows
pub fn sweep_once(state: &AppState, clock: &dyn Clock) -> (usize, usize) {
    let now = clock.now();
    let expired = state.cache.sweep_expired(now);
    let idle = state.admission.sweep(now);

    CACHE_SIZE.set(state.cache.len() as f64);
    ADMISSION_KEYS.set(state.admission.tracked_keys() as f64);

    (expired, idle)
}

// Sweeper loop, bounds memory for keys that are never read again
pub async fn sweeper(state: Arc<AppState>, clock: Arc<dyn Clock>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    tracing::info!(interval = ?sweep_interval, "sweeper started");

    loop {
        interval.tick().await;

        let (expired, idle) = sweep_once(&state, clock.as_ref());
        if expired > 0 || idle > 0 {
            tracing::debug!(expired, idle, "swept stale entries");
        }
    }
}
