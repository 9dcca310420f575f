//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub ride: RideConfig,
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Ride lifecycle policy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RideConfig {
    /// Restrict `start` to a window beginning at the scheduled departure time
    pub enforce_start_window: bool,
    /// Length of the start window in minutes after the scheduled time
    pub start_window_minutes: i64,
    /// Spawn the next occurrence of a recurring ride when it completes
    pub auto_reschedule: bool,
    /// Retries for a ride mutation that loses a concurrent-write race
    pub max_save_attempts: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("RIDELINK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::RideLinkError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/ridelink".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "ridelink:".to_string(),
                ttl_seconds: 3600,
            },
            ride: RideConfig {
                enforce_start_window: true,
                start_window_minutes: 15,
                auto_reschedule: true,
                max_save_attempts: 3,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/ridelink".to_string(),
                max_files: 5,
            },
        }
    }
}
