use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use chartfeed::config::FeedConfig;
use chartfeed::provider::YahooClient;
use chartfeed::state::AppState;

#[tokio::main]
async fn main() {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = FeedConfig::from_env();
    let bind = cfg.bind.clone();
    let port = cfg.port;

    let source = Arc::new(
        YahooClient::new(
            &cfg.upstream_url,
            Duration::from_secs(cfg.upstream_timeout_secs),
        )
        .expect("failed to build upstream http client"),
    );
    let state = AppState::new(cfg, source);
    let app = chartfeed::app(state);

    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .expect("invalid bind address");

    tracing::info!("chartfeed listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, gracefully stopping…");
}
