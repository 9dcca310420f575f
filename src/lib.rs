//! RideLink ride-sharing backend
//!
//! A marketplace backend where vehicle owners post rides with seat
//! inventories, passengers request seats, owners accept or reject requests,
//! and rides move through a scheduled / in-progress / completed lifecycle
//! with per-booking payment tracking, reviews and notifications.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ErrorKind, Result, RideLinkError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
