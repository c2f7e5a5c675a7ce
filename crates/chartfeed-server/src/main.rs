use chartfeed_core::FeedConfig;
use chartfeed_server::{api::app_router, build_state, cli::Cli, init_tracing};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = FeedConfig::from_env();
    let state = build_state(&config);
    let router = app_router(state, cli.request_timeout());

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port)).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        min_spacing_ms = config.min_spacing.as_millis() as u64,
        max_attempts = config.retry.attempts(),
        historical = config.historical_enabled,
        "listening"
    );
    axum::serve(listener, router).await?;
    Ok(())
}
