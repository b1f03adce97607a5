use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("worker_requests_total", "Total number of enrich requests").unwrap();
    pub static ref RATE_LIMITED_TOTAL: Counter =
        register_counter!("worker_rate_limited_total", "Requests rejected by admission control").unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("worker_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("worker_cache_misses_total", "Total cache misses").unwrap();
    pub static ref PRODUCER_FAILURES: Counter =
        register_counter!("worker_producer_failures_total", "Enrichment producer failures, timeouts included").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "worker_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("worker_cache_size", "Current number of items in cache").unwrap();
    pub static ref ADMISSION_KEYS: Gauge =
        register_gauge!("worker_admission_keys", "Keys with a live admission window").unwrap();
}
