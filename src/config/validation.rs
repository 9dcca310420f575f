//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, RideLinkError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_ride_config(&settings.ride)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(RideLinkError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(RideLinkError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(RideLinkError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(RideLinkError::Config("Redis URL is required".to_string()));
    }

    Ok(())
}

/// Validate ride policy configuration
fn validate_ride_config(config: &super::RideConfig) -> Result<()> {
    if config.enforce_start_window && config.start_window_minutes <= 0 {
        return Err(RideLinkError::Config(
            "Start window must be greater than 0 minutes when enforced".to_string(),
        ));
    }

    if config.max_save_attempts == 0 {
        return Err(RideLinkError::Config(
            "At least one save attempt is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(RideLinkError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(RideLinkError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_rejects_zero_start_window() {
        let mut settings = Settings::default();
        settings.ride.start_window_minutes = 0;
        assert_matches!(validate_settings(&settings), Err(RideLinkError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(RideLinkError::Config(_)));
    }
}
