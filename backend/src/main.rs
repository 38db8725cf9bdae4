use anyhow::Context;
use todo_backend::config::Config;
use todo_backend::{create_router, AppState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    tracing::info!(backend = config.store.backend_name(), "Document store configured");

    // The store is connected lazily by the first request that needs it.
    let app = create_router(AppState::new(config.store.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "Server running");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
