//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod booking;
pub mod notification;
pub mod review;
pub mod ride;
pub mod user;

// Re-export commonly used models
pub use booking::{Booking, BookingStatus, PaymentMethod, PaymentStatus};
pub use notification::{CreateNotificationRequest, Notification, NotificationSeverity};
pub use review::{Review, SubmitReviewRequest};
pub use ride::{
    CreateRideRequest, EarningsSummary, MyRidesResponse, RecurringSchedule, Ride, RidePage,
    RideSearchFilter, RideStatus, RideView, UpdateRideRequest,
};
pub use user::{CreateUserRequest, User};
