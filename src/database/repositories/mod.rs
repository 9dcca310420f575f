//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod notification;
pub mod review;
pub mod ride;
pub mod user;

// Re-export repositories
pub use notification::NotificationRepository;
pub use review::ReviewRepository;
pub use ride::{MembershipColumn, RideRepository};
pub use user::UserRepository;
