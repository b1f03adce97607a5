use clap::{Parser, ValueEnum};

// Which part of the fingerprint the admission window is keyed by
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitScope {
    // one window per "{provider}:{match_id}"
    Match,
    // one window shared by every match of a provider
    Provider,
}

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "twelfthman-worker")]
#[command(about = "Rate-limited, caching enrichment worker for 12thMan")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    // Max admitted requests per key per window
    #[arg(long, env = "WORKER_REQUESTS_PER_MINUTE", default_value_t = 30)]
    pub requests_per_minute: u32,

    // Rate limit window in seconds
    #[arg(long, env = "WORKER_RATE_WINDOW_SECONDS", default_value_t = 60)]
    pub rate_window: u64,

    // Rate limit granularity
    #[arg(long, env = "WORKER_RATE_LIMIT_SCOPE", value_enum, default_value_t = RateLimitScope::Match)]
    pub rate_limit_scope: RateLimitScope,

    // Cache TTL in seconds
    #[arg(short, long, env = "WORKER_CACHE_TTL_SECONDS", default_value_t = 3600)]
    pub cache_ttl: u64,

    // How often expired cache entries and idle windows are swept
    #[arg(long, env = "WORKER_SWEEP_INTERVAL_SECONDS", default_value_t = 60)]
    pub sweep_interval: u64,

    // Scraper service to forward to; stub payloads when unset
    // Example: "localhost:9000"
    #[arg(short, long, env = "WORKER_UPSTREAM_URL")]
    pub upstream_url: Option<String>,

    // Per-request producer timeout in seconds
    #[arg(long, env = "WORKER_PRODUCER_TIMEOUT_SECONDS", default_value_t = 8)]
    pub producer_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_worker_contract() {
        let args = Args::try_parse_from(["twelfthman-worker"]).unwrap();
        assert_eq!(args.requests_per_minute, 30);
        assert_eq!(args.rate_window, 60);
        assert_eq!(args.cache_ttl, 3600);
        assert_eq!(args.rate_limit_scope, RateLimitScope::Match);
    }

    #[test]
    fn scope_parses_from_flag() {
        let args = Args::try_parse_from([
            "twelfthman-worker",
            "--rate-limit-scope",
            "provider",
            "--upstream-url",
            "scraper:9000",
        ])
        .unwrap();
        assert_eq!(args.rate_limit_scope, RateLimitScope::Provider);
        assert_eq!(args.upstream_url.as_deref(), Some("scraper:9000"));
    }
}
