use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bulletin_api::config::ServerConfig;
use bulletin_api::router::build_app_router;
use bulletin_api::state::AppState;
use bulletin_db::DbConfig;
use bulletin_lifecycle::{DeliveryRegistry, LifecycleEngine};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str =
    "bulletin_api=debug,bulletin_db=debug,bulletin_lifecycle=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    );
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    let db_config = DbConfig::from_env().expect("Invalid database configuration");

    // --- Database ---
    let pool = bulletin_db::create_pool(&db_config)
        .await
        .expect("Failed to connect to database");
    tracing::info!(
        min = db_config.min_connections,
        max = db_config.max_connections,
        "Database connection pool created"
    );

    bulletin_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    bulletin_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Lifecycle engine ---
    let deliveries = DeliveryRegistry::from_env().expect("Invalid delivery configuration");
    tracing::info!(?deliveries, "Delivery channels configured");
    let engine = LifecycleEngine::new(
        pool.clone(),
        Arc::new(deliveries),
        db_config.transaction_timeout,
    );

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        tx_timeout: db_config.transaction_timeout,
        engine: Arc::new(engine),
    };

    // --- Router ---
    let app = build_app_router(state, &config).expect("Invalid CORS configuration");

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // The sender is dropped if the server exits on its own, which also
    // releases the wait below.
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(());
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                let _ = shutdown_tx.send(());
            })
            .await
    });

    let _ = shutdown_rx.changed().await;

    // --- Drain in-flight requests ---
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Server stopped accepting connections"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed"),
        Err(_) => tracing::warn!(?drain, "In-flight requests did not drain in time"),
    }

    // --- Post-shutdown cleanup ---
    pool.close().await;
    tracing::info!("Database pool closed, graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
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
