use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use community_calendar_api::{
    app, config,
    jobs::{JobScheduler, PoolMetricsJob, ScrapeEventsJob},
    middleware,
    services::{IngestionService, MeetupScraper},
};
use tracing::{info, warn};

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = config::Config::load()?;
    middleware::logging::init_logging(&config.logging);
    middleware::init_metrics()?;

    info!("Starting Community Calendar API v{}", env!("CARGO_PKG_VERSION"));

    let db_config = persistence::db::DatabaseConfig::from(&config.database);
    let pool = persistence::db::create_pool(&db_config).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let scraper = MeetupScraper::new(&config.ingestion, config.feeds.tz())?;
    let ingestion = Arc::new(IngestionService::new(pool.clone(), Arc::new(scraper)));

    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    if config.ingestion.enabled {
        scheduler.register(ScrapeEventsJob::new(
            Arc::clone(&ingestion),
            config.ingestion.interval_minutes,
        ));
    } else {
        info!("Scheduled ingestion disabled");
    }
    scheduler.start();

    let addr = config.socket_addr()?;
    let app = app::create_app(config, pool, ingestion);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;

    Ok(())
}
