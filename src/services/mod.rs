//! Services module
//!
//! This module contains business logic services

pub mod notification;
pub mod redis;
pub mod review;
pub mod ride;
pub mod user;

// Re-export commonly used services
pub use notification::NotificationService;
pub use redis::RedisService;
pub use review::ReviewService;
pub use ride::RideService;
pub use user::UserService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub ride_service: RideService,
    pub user_service: UserService,
    pub review_service: ReviewService,
    pub notification_service: NotificationService,
    pub redis_service: RedisService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: Settings) -> Result<Self> {
        let redis_service = RedisService::new(settings.clone())?;
        let user_service = UserService::new(database.users.clone());
        let notification_service = NotificationService::new(database.notifications.clone());
        let review_service = ReviewService::new(
            database.reviews.clone(),
            database.rides.clone(),
            redis_service.clone(),
            notification_service.clone(),
        );
        let ride_service = RideService::new(
            database.rides.clone(),
            user_service.clone(),
            review_service.clone(),
            notification_service.clone(),
            settings,
        );

        Ok(Self {
            ride_service,
            user_service,
            review_service,
            notification_service,
            redis_service,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let redis_healthy = self.redis_service.health_check().await.unwrap_or(false);

        ServiceHealthStatus {
            redis_healthy,
            ride_service_ready: true,
            user_service_ready: true,
            notification_service_ready: true,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub redis_healthy: bool,
    pub ride_service_ready: bool,
    pub user_service_ready: bool,
    pub notification_service_ready: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.ride_service_ready && self.user_service_ready && self.notification_service_ready
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.redis_healthy {
            issues.push("Redis connection failed".to_string());
        }
        if !self.ride_service_ready {
            issues.push("Ride service not ready".to_string());
        }
        if !self.user_service_ready {
            issues.push("User service not ready".to_string());
        }
        if !self.notification_service_ready {
            issues.push("Notification service not ready".to_string());
        }

        issues
    }
}
