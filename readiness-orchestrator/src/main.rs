use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use readiness_orchestrator::poller::ReadinessPoller;
use readiness_orchestrator::provider_manager::ProviderManager;
use readiness_orchestrator::routes::{create_router, AppState};
use readiness_orchestrator::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::from_env().context("Invalid configuration")?;
    let provider = ProviderManager::get_provider(&settings.provider, &settings)
        .await
        .with_context(|| {
            format!(
                "Provider '{}' is unknown or not compiled in (enable the provider-{} feature)",
                settings.provider, settings.provider
            )
        })?;
    info!(
        "✅ Provider '{}' ready (max {} rounds, every {:?}, up to {:?} waiting)",
        provider.name(),
        settings.poller.max_attempts,
        settings.poller.poll_interval,
        settings.poller.max_wait()
    );

    let shutdown = CancellationToken::new();
    let state = Arc::new(AppState {
        poller: ReadinessPoller::new(provider, settings.poller),
        shutdown: shutdown.clone(),
    });
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", settings.bind_addr))?;
    info!("Readiness orchestrator listening on {}", settings.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("HTTP server failed")?;

    info!("👋 Readiness orchestrator stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels in-flight waits.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("🛑 Shutdown requested, cancelling in-flight waits");
    shutdown.cancel();
}
