use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fleet_admin::build_router;
use fleet_admin::config::{DatabaseConfig, EnvironmentConfig};
use fleet_admin::database::DatabaseConnection;
use fleet_admin::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before reading any configuration
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🚗 Fleet Admin API");
    info!("==================");

    let config = EnvironmentConfig::from_env().context("invalid configuration")?;
    info!("⚙️ Environment: {}", config.environment);

    let db_connection = match DatabaseConnection::new(&DatabaseConfig::new(&config.database_url)).await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error connecting to the database: {:#}", e);
            return Err(e);
        }
    };

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;

    let state = AppState::new(db_connection.pool().clone(), config);
    let app = build_router(state);

    info!("🌐 Server listening on http://{}", addr);
    info!("🔍 Endpoints:");
    info!("   GET  /health");
    info!("🚗 Vehicle:");
    info!("   POST /vehicle/add-vehicle, GET /vehicle/get-vehicles, GET /vehicle/get-vehicle/:id");
    info!("   PUT  /vehicle/update-vehicle/:id, DELETE /vehicle/delete-vehicle/:id");
    info!("   PUT  /vehicle/update-vehicle-owner/:id, PUT /vehicle/remove-owner/:owner_id");
    info!("   PUT  /vehicle/update-mileage/:id, GET /vehicle/status-counts, GET /vehicle/type-counts");
    info!("👤 Owner:");
    info!("   POST /owner/add-owner, GET /owner/get-owners, GET /owner/get-owner/:id");
    info!("   PUT  /owner/update-owner/:id, DELETE /owner/delete-owner/:id");
    info!("   GET  /owner/search?query=, GET /owner/gender-counts, GET /owner/check-vehicles/:id");
    info!("🔔 Reminder:");
    info!("   POST /reminder/add-reminder, GET /reminder/get-reminders, GET /reminder/get-reminder/:id");
    info!("   PUT  /reminder/update-reminder/:id, PUT /reminder/complete-reminder/:id");
    info!("   GET  /reminder/overdue, GET /reminder/overdue-details, GET /reminder/status/:status");
    info!("   POST /reminder/generate-auto, GET /reminder/status-counts, GET /reminder/service-type-counts");
    info!("🔐 Admin:");
    info!("   POST /admin/register, POST /admin/login, GET /admin/me");
    info!("📦 Inventory:");
    info!("   POST /inventory/add-item, GET /inventory/get-items, PATCH /inventory/adjust-stock/:id");
    info!("   GET  /inventory/low-stock, GET /inventory/category-counts");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("could not bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
