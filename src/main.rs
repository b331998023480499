use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fitreview_api::{app, config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .init();

    let config = config::config().clone();
    tracing::info!(
        "Starting FitReview API in {:?} mode ({:?} store)",
        config.environment,
        config.database.backend
    );

    if fitreview_api::is_production!() && config.database.backend == config::StoreBackend::Memory {
        anyhow::bail!("refusing to run production on the in-memory store; set STORE_BACKEND=postgres");
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    let state = app::build_state(config).await?;
    app::serve(listener, state).await
}
