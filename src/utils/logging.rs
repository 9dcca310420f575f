//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the RideLink backend.

use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "ridelink.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log ride lifecycle transitions with structured data
pub fn log_ride_transition(ride_id: uuid::Uuid, from: &str, to: &str, actor_id: i64) {
    info!(
        ride_id = %ride_id,
        from = from,
        to = to,
        actor_id = actor_id,
        "Ride status transition"
    );
}

/// Log booking actions
pub fn log_booking_action(ride_id: uuid::Uuid, passenger_id: i64, action: &str, details: Option<&str>) {
    info!(
        ride_id = %ride_id,
        passenger_id = passenger_id,
        action = action,
        details = details,
        "Booking action performed"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: i64, action: &str, target: Option<&str>) {
    warn!(
        admin_id = admin_id,
        action = action,
        target = target,
        "Admin action performed"
    );
}

/// Log a failed best-effort side effect
pub fn log_side_effect_failure(effect: &str, error: &str) {
    error!(effect = effect, error = error, "Best-effort side effect failed");
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
