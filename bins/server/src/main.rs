//! Zakat Ledger API Server
//!
//! Main entry point for the Zakat ledger backend service.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zakat_api::{AppState, create_router};
use zakat_core::{FinanceService, disbursement::run_scheduler};
use zakat_db::{PgFinanceRepository, connect, migration::Migrator};
use zakat_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zakat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database and bring the schema up to date
    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");
    Migrator::up(&db, None).await?;

    let repo = PgFinanceRepository::new(db);
    repo.ensure_account().await?;
    let finance = FinanceService::new(Arc::new(repo));

    let jwt_service = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        ..JwtConfig::default()
    });

    // Shutdown fan-out for the server and the scheduler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if config.scheduler.enabled {
        let mut rx = shutdown_rx.clone();
        info!(run_on_startup = config.scheduler.run_on_startup, "Disbursement scheduler enabled");
        Some(tokio::spawn(run_scheduler(
            finance.clone(),
            config.scheduler.run_on_startup,
            async move {
                let _ = rx.wait_for(|stop| *stop).await;
            },
        )))
    } else {
        info!("Disbursement scheduler disabled");
        None
    };

    let state = AppState {
        finance,
        jwt_service: Arc::new(jwt_service),
    };
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    let mut server_rx = shutdown_rx;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
        }
        let _ = shutdown_tx.send(true);
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = server_rx.wait_for(|stop| *stop).await;
        })
        .await?;

    if let Some(handle) = scheduler {
        handle.await?;
    }

    Ok(())
}
