//! Gym API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # In-memory storage, no database needed
//! GYM_STORAGE=memory cargo run --bin gym-api
//!
//! # PostgreSQL storage with workload notifications
//! GYM_DATABASE_URL=postgres://... GYM_WORKLOAD_SERVICE_URL=http://localhost:8081/api/v1/workload \
//!     cargo run --bin gym-api
//! ```
//!
//! # Environment Variables
//!
//! * `GYM_HOST` / `GYM_PORT` - Bind address (default: 0.0.0.0:8080)
//! * `GYM_JWT_SECRET` - Token signing secret (required in production)
//! * `GYM_JWT_EXPIRATION_SECS` - Session lifetime (default: 600)
//! * `GYM_STORAGE` - `postgres` (default) or `memory`
//! * `GYM_DATABASE_URL` - PostgreSQL connection string
//! * `GYM_DB_MAX_CONNECTIONS` / `GYM_DB_MIN_CONNECTIONS` / `GYM_DB_*_SECS` - Pool tuning
//! * `GYM_WORKLOAD_SERVICE_URL` - Trainer workload API; notifications are skipped when unset
//! * `GYM_LOG_LEVEL` / `GYM_LOG_JSON` - Log filter and format; `RUST_LOG` takes precedence

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::CircuitBreakerConfig;
use domain_gym::{
    GymPorts, HttpWorkloadNotifier, InMemoryGym, NoopWorkloadNotifier, WorkloadClientConfig,
    WorkloadNotifier,
};
use infra_db::{create_pool, run_migrations, PostgresGymAdapter};
use interface_api::config::{ApiConfig, StorageKind};
use interface_api::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("failed to load GYM_* configuration")?;
    init_tracing(&config.log_level, config.log_json);
    config.validate()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        storage = ?config.storage,
        "Starting Gym API Server"
    );

    let workload = workload_notifier(&config)?;
    let ports = build_ports(&config, workload).await?;
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server_addr()))?;

    let state = AppState::new(config, ports)?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber
///
/// `RUST_LOG` overrides `log_level` when set.
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

fn workload_notifier(config: &ApiConfig) -> anyhow::Result<Arc<dyn WorkloadNotifier>> {
    match config.workload_url() {
        Some(url) => {
            let client = HttpWorkloadNotifier::new(WorkloadClientConfig {
                base_url: url.to_string(),
                timeout_secs: config.workload_timeout_secs,
                circuit_breaker: CircuitBreakerConfig::default(),
            })?;
            tracing::info!(url = %client.update_url(), "Workload notifications enabled");
            Ok(Arc::new(client))
        }
        None => {
            tracing::warn!("No workload service configured, notifications disabled");
            Ok(Arc::new(NoopWorkloadNotifier))
        }
    }
}

async fn build_ports(config: &ApiConfig, workload: Arc<dyn WorkloadNotifier>) -> anyhow::Result<GymPorts> {
    match config.storage {
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on restart");
            Ok(InMemoryGym::new().into_ports(workload))
        }
        StorageKind::Postgres => {
            tracing::info!("Connecting to database...");
            let pool = create_pool(config.database()).await?;
            run_migrations(&pool).await?;
            tracing::info!("Database ready");

            let adapter = Arc::new(PostgresGymAdapter::new(pool));
            Ok(GymPorts::from_store(adapter, workload))
        }
    }
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
