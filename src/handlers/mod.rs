mod health;
mod metrics;
mod enrich;

use axum::{Router, routing::get};
use std::sync::Arc;
use crate::state::AppState;

use enrich::{enrich_fotmob_handler, enrich_sofascore_handler};
use health::health_handler;
use metrics::metrics_handler;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/enrich/fotmob/{match_id}", get(enrich_fotmob_handler))
        .route("/enrich/sofascore/{match_id}", get(enrich_sofascore_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
