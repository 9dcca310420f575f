//! User model
//!
//! Account storage and credentials live outside this service; the backend
//! only needs the profile fields used for authorization and display.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const ROLE_USER: &str = "USER";
pub const ROLE_ADMIN: &str = "ADMIN";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: String,
    pub vehicle_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub name: String,
    pub role: Option<String>,
    pub vehicle_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let user = User {
            id: 1,
            email: "admin@ridelink.example".to_string(),
            name: "Admin".to_string(),
            role: ROLE_ADMIN.to_string(),
            vehicle_type: None,
            created_at: Utc::now(),
        };
        assert!(user.is_admin());

        let user = User { role: ROLE_USER.to_string(), ..user };
        assert!(!user.is_admin());
    }
}
