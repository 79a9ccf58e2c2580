// Main entry point for the voice support backend

use anyhow::{Context, Result};
use support_core::kernel::ServerDeps;
use support_core::server::{build_app, AppState};
use support_core::BackendConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,support_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Voice Support Backend");

    let config = BackendConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        memory_backend = ?config.memory_backend,
        reports_dir = %config.reports_dir.display(),
        "Configuration loaded"
    );

    let deps = ServerDeps::from_config(&config)?;
    let app = build_app(AppState::new(deps, config.reports_dir.clone()));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}
