use clap::Parser; // for cli
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use twelfthman_worker::clock::{Clock, SystemClock};
use twelfthman_worker::config::Args;
use twelfthman_worker::enrich::Enricher;
use twelfthman_worker::state::AppState;
use twelfthman_worker::{handlers, sweeper};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // parse cli arguments (env vars fill anything not given on the command line)
    let args = Args::parse();

    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "worker failed");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new());
    let enricher = Enricher::from_upstream(args.upstream_url.as_deref(), reqwest::Client::new());

    // creating shared state
    let state = Arc::new(AppState::new(&args, enricher, clock.clone())?);

    if args.sweep_interval > 0 {
        let sweep_state = state.clone();
        let sweep_interval = Duration::from_secs(args.sweep_interval);
        tokio::spawn(async move {
            sweeper::sweeper(sweep_state, clock, sweep_interval).await;
        });
    }

    let app = handlers::router(state.clone());

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        port = args.port,
        producer = %state.enricher.describe(),
        cache_ttl_secs = state.ttl.as_secs(),
        rate_limit = state.admission.limit(),
        rate_window_secs = state.admission.window().as_secs(),
        scope = ?state.scope,
        "12thMan worker running"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
