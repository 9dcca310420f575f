//! Database service layer
//!
//! This module bundles the repositories behind one handle for wiring into
//! the application services.

use crate::database::{
    DatabasePool, NotificationRepository, ReviewRepository, RideRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub rides: RideRepository,
    pub users: UserRepository,
    pub notifications: NotificationRepository,
    pub reviews: ReviewRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            rides: RideRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            reviews: ReviewRepository::new(pool),
        }
    }
}
