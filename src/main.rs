use option_compass::config::{self, AppConfig};
use option_compass::errors::EngineResult;
use option_compass::{server, state};

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("option_compass starting");

    // Load config
    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        default_rate_pct = cfg.default_rate_pct,
        multiplier = cfg.contract_multiplier,
        payoff_samples = cfg.payoff_samples,
        "config loaded"
    );

    if let Err(e) = serve(cfg).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn serve(cfg: AppConfig) -> EngineResult<()> {
    let addr = format!("0.0.0.0:{}", cfg.server_port);
    let app = server::router(state::AppState::new(cfg));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
