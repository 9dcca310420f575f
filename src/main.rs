//! RideLink ride-sharing backend
//!
//! Main application entry point: loads configuration, connects storage,
//! runs migrations and keeps the service stack alive until shutdown. The
//! transport layer mounts on top of [`ServiceFactory`] and is provisioned
//! separately.

use tracing::{error, info};

use RideLink::{
    config::Settings,
    database::{connection, DatabaseService},
    services::ServiceFactory,
    utils::logging,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    logging::init_logging(&settings.logging)?;

    info!("Starting RideLink backend...");

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..Default::default()
    };
    let db_pool = connection::create_pool(&db_config).await?;

    // Run database migrations
    connection::run_migrations(&db_pool).await?;

    // Initialize services
    info!("Initializing services...");
    let database_service = DatabaseService::new(db_pool.clone());
    let services = ServiceFactory::new(database_service, settings)?;

    let health = services.health_check().await;
    if health.is_healthy() {
        info!("RideLink backend is ready");
    } else {
        for issue in health.get_issues() {
            error!(issue = %issue, "Service health issue");
        }
    }

    // Keep the stack alive until shutdown
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received, closing connections...");
    db_pool.close().await;

    info!("RideLink backend has been shut down.");
    Ok(())
}
