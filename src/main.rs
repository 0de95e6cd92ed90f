use memberauth::app::{AppState, build_router};
use memberauth::core::config::Config;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if exists)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memberauth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load application config from environment variables
    let config = Config::from_env()?;

    // Log config status (without revealing secrets)
    tracing::info!(
        "Config loaded: database={}, token_key={}, bcrypt_cost={}",
        config.has_database(),
        config.has_token_key(),
        config.bcrypt_cost
    );

    let state = AppState::from_config(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        return;
    }

    tracing::info!("Received Ctrl+C signal, initiating graceful shutdown");
}
