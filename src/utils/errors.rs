//! Error handling for RideLink
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::ride::RideStatus;

/// Main error type for the RideLink backend
#[derive(Error, Debug)]
pub enum RideLinkError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Ride not found: {ride_id}")]
    RideNotFound { ride_id: Uuid },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("User not found for email: {email}")]
    UserEmailNotFound { email: String },

    #[error("Notification not found: {id}")]
    NotificationNotFound { id: Uuid },

    #[error("No approved booking found for passenger {passenger_id}")]
    NoApprovedBooking { passenger_id: i64 },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Cannot book your own ride")]
    OwnRideBooking,

    #[error("Already requested to join this ride")]
    DuplicateRequest { passenger_id: i64 },

    #[error("Already a passenger on this ride")]
    AlreadyBooked { passenger_id: i64 },

    #[error("Must request at least 1 seat")]
    InvalidSeatCount { requested: i32 },

    #[error("Not enough seats available. Available: {available}, Requested: {requested}")]
    InsufficientSeats { available: i32, requested: i32 },

    #[error("No pending request found for passenger {passenger_id}")]
    NoPendingRequest { passenger_id: i64 },

    #[error("Passenger {passenger_id} is not in the request queue")]
    NotInRequests { passenger_id: i64 },

    #[error("No seats available")]
    NoSeatsAvailable,

    #[error("Passenger {passenger_id} is not an accepted passenger of this ride")]
    NotAcceptedPassenger { passenger_id: i64 },

    #[error("Cannot remove passengers after the ride has started")]
    RideNotEditable { status: RideStatus },

    #[error("Payment already collected for passenger {passenger_id}")]
    PaymentAlreadyCollected { passenger_id: i64 },

    #[error("Ride cannot be {action} from status {status}")]
    InvalidRideState {
        action: &'static str,
        status: RideStatus,
    },

    #[error("Cannot start ride without accepted passengers")]
    NoAcceptedPassengers,

    #[error("You already have a ride in progress. End the current ride before starting a new one")]
    RideAlreadyInProgress { ride_id: Uuid },

    #[error("Ride can only be started between its scheduled time and {window_minutes} minutes after. Scheduled: {scheduled}")]
    OutsideStartWindow {
        scheduled: DateTime<Utc>,
        window_minutes: i64,
    },

    #[error("Ride {ride_id} was modified concurrently")]
    StaleRide { ride_id: Uuid },

    #[error("Review already submitted for this ride")]
    DuplicateReview { ride_id: Uuid, reviewer_id: i64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for RideLink operations
pub type Result<T> = std::result::Result<T, RideLinkError>;

/// Coarse error classification surfaced to callers alongside the message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    InvalidState,
    Conflict,
    Validation,
    Internal,
}

impl RideLinkError {
    /// Classify the error for the caller-facing contract
    pub fn kind(&self) -> ErrorKind {
        match self {
            RideLinkError::RideNotFound { .. }
            | RideLinkError::UserNotFound { .. }
            | RideLinkError::UserEmailNotFound { .. }
            | RideLinkError::NotificationNotFound { .. }
            | RideLinkError::NoApprovedBooking { .. } => ErrorKind::NotFound,

            RideLinkError::PermissionDenied(_) => ErrorKind::Unauthorized,

            RideLinkError::RideNotEditable { .. }
            | RideLinkError::InvalidRideState { .. }
            | RideLinkError::NoAcceptedPassengers
            | RideLinkError::OutsideStartWindow { .. } => ErrorKind::InvalidState,

            RideLinkError::DuplicateRequest { .. }
            | RideLinkError::AlreadyBooked { .. }
            | RideLinkError::InsufficientSeats { .. }
            | RideLinkError::NoPendingRequest { .. }
            | RideLinkError::NotInRequests { .. }
            | RideLinkError::NoSeatsAvailable
            | RideLinkError::NotAcceptedPassenger { .. }
            | RideLinkError::PaymentAlreadyCollected { .. }
            | RideLinkError::RideAlreadyInProgress { .. }
            | RideLinkError::StaleRide { .. }
            | RideLinkError::DuplicateReview { .. } => ErrorKind::Conflict,

            RideLinkError::OwnRideBooking
            | RideLinkError::InvalidSeatCount { .. }
            | RideLinkError::InvalidInput(_) => ErrorKind::Validation,

            RideLinkError::Database(_)
            | RideLinkError::Migration(_)
            | RideLinkError::Redis(_)
            | RideLinkError::Serialization(_)
            | RideLinkError::Io(_)
            | RideLinkError::Config(_)
            | RideLinkError::ServiceUnavailable(_) => ErrorKind::Internal,
        }
    }

    /// Check if the error is a transient infrastructure failure the caller may retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RideLinkError::Database(_)
                | RideLinkError::Redis(_)
                | RideLinkError::Io(_)
                | RideLinkError::StaleRide { .. }
                | RideLinkError::ServiceUnavailable(_)
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::Unauthorized => write!(f, "UNAUTHORIZED"),
            ErrorKind::InvalidState => write!(f, "INVALID_STATE"),
            ErrorKind::Conflict => write!(f, "CONFLICT"),
            ErrorKind::Validation => write!(f, "VALIDATION_ERROR"),
            ErrorKind::Internal => write!(f, "INTERNAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = RideLinkError::InsufficientSeats {
            available: 1,
            requested: 2,
        };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.to_string().contains("Available: 1"));
        assert!(err.to_string().contains("Requested: 2"));

        let err = RideLinkError::PermissionDenied("Only ride owner can accept requests".to_string());
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let err = RideLinkError::RideNotFound { ride_id: Uuid::new_v4() };
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_stale_ride_is_transient_conflict() {
        let err = RideLinkError::StaleRide { ride_id: Uuid::new_v4() };
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(err.is_transient());
    }
}
