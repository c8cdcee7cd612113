use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use pricesorter_api::background::dataset_refresh;
use pricesorter_api::config::{LogFormat, ServerConfig};
use pricesorter_api::router::build_app_router;
use pricesorter_api::state::AppState;
use pricesorter_core::freshness::FreshnessTracker;
use pricesorter_core::updater::{CommandUpdater, Updater};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = pricesorter_db::create_pool(&config.database_url, config.db_max_connections)
        .context("Invalid DATABASE_URL")?;
    tracing::info!(database_url = %config.database_url, "Database connection pool created");

    // The updater may not have produced the file yet; requests report the
    // failure until it does.
    match pricesorter_db::health_check(&pool).await {
        Ok(()) => tracing::info!("Database health check passed"),
        Err(e) => tracing::warn!(error = %e, "Database health check failed, serving anyway"),
    }

    // --- Dataset refresh ---
    let freshness = Arc::new(FreshnessTracker::new());
    let mut command = CommandUpdater::new(&config.updater.program, config.updater.args.clone());
    if let Some(dir) = &config.updater.working_directory {
        command = command.with_working_directory(dir);
    }
    let updater: Arc<dyn Updater> = Arc::new(command);

    if config.updater.run_on_startup {
        drop(dataset_refresh::trigger_refresh(
            Arc::clone(&updater),
            &freshness,
        ));
    }

    let refresh_cancel = CancellationToken::new();
    let refresh_handle = if config.updater.enabled {
        let schedule = config.updater.schedule.clone();
        let updater = Arc::clone(&updater);
        let freshness = Arc::clone(&freshness);
        let cancel = refresh_cancel.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = dataset_refresh::run(schedule, updater, freshness, cancel).await {
                tracing::error!(error = %e, "Dataset refresh scheduler failed");
            }
        }))
    } else {
        tracing::info!("Dataset refresh scheduler disabled");
        None
    };

    // --- App state + router ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid HOST/PORT combination")?;

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config),
        freshness,
    };
    let app = build_app_router(state);

    // --- Start server ---
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    refresh_cancel.cancel();
    if let Some(handle) = refresh_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        tracing::info!("Dataset refresh scheduler stopped");
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter.
fn init_tracing(format: LogFormat) {
    let json = format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pricesorter_api=debug,pricesorter_db=info,pricesorter_core=info,tower_http=debug"
                    .into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .init();
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM to trigger graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
