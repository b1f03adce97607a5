//! Enrichment worker for 12thMan.
//!
//! Every enrich request passes a per-key sliding-window admission check and
//! then a TTL cache before the (stub or upstream) producer is invoked.

pub mod cache;
pub mod clock;
pub mod config;
pub mod enrich;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod rate_limit;
pub mod state;
pub mod sweeper;
