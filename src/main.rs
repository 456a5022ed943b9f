//! TeamDrive Server — hierarchical file and folder storage
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

use teamdrive_api::{AppState, build_router};
use teamdrive_auth::HttpTeamDirectory;
use teamdrive_core::config::AppConfig;
use teamdrive_core::error::AppError;
use teamdrive_core::traits::EventPublisher;
use teamdrive_database::migration::run_migrations;
use teamdrive_database::{DatabasePool, PgNodeStore};
use teamdrive_events::{MemoryEventBus, RedisEventPublisher, RedisStatusListener};
use teamdrive_service::{Collaborators, ServiceContainer, ServiceSettings};
use teamdrive_storage::S3BlobStore;

const MEMORY_BUS_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load `config/default.toml`, the environment overlay and `TEAMDRIVE__*` variables
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TEAMDRIVE_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TeamDrive v{}", env!("CARGO_PKG_VERSION"));
    let shutdown = CancellationToken::new();

    // ── Step 1: Database ─────────────────────────────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    if config.database.run_migrations {
        run_migrations(db_pool.pool()).await?;
    }
    let nodes = Arc::new(PgNodeStore::new(db_pool.pool().clone()));

    // ── Step 2: Blob store ───────────────────────────────────────
    let blobs = Arc::new(S3BlobStore::new(&config.storage.s3).await?);

    // ── Step 3: Team directory ───────────────────────────────────
    let directory = Arc::new(HttpTeamDirectory::new(&config.team_directory)?);

    // ── Step 4: Event publisher ──────────────────────────────────
    let events: Arc<dyn EventPublisher> = match config.events.provider.as_str() {
        "redis" => Arc::new(
            RedisEventPublisher::connect(&config.events.redis_url, &config.events.channel_prefix)
                .await?,
        ),
        "memory" => Arc::new(MemoryEventBus::new(MEMORY_BUS_CAPACITY)),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown events provider '{other}'"
            )));
        }
    };
    tracing::info!(provider = %config.events.provider, "Event publisher ready");

    // ── Step 5: Services ─────────────────────────────────────────
    let services = ServiceContainer::new(
        Collaborators {
            nodes,
            blobs,
            directory,
            events,
        },
        ServiceSettings::from_config(&config.storage),
    );

    // ── Step 6: Status listener ──────────────────────────────────
    let listener_handle = if config.events.provider == "redis" {
        let listener = RedisStatusListener::new(
            &config.events.redis_url,
            config.events.channel(&config.events.status_channel),
            services.files.clone(),
        )?;
        let token = shutdown.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = listener.run(token).await {
                tracing::error!(error = %e, "Status listener failed");
            }
        }))
    } else {
        tracing::info!("Status listener disabled for in-memory events");
        None
    };

    // ── Step 7: Build and start HTTP server ──────────────────────
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(config.server, services));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("TeamDrive server listening on {}", addr);

    // ── Step 8: Graceful shutdown ────────────────────────────────
    let token = shutdown.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
            token.cancel();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 9: Wait for background tasks ────────────────────────
    shutdown.cancel();
    if let Some(handle) = listener_handle {
        let _ = tokio::time::timeout(grace, handle).await;
    }
    db_pool.close().await;

    tracing::info!("TeamDrive server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
