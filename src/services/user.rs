//! User service implementation
//!
//! Account storage, credentials and tokens live outside this backend; the
//! service exposes the user lookups the ride core needs for authorization
//! and display enrichment.

use tracing::{debug, info};

use crate::database::repositories::UserRepository;
use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::{Result, RideLinkError};
use crate::utils::helpers::is_valid_email;

/// User service for profile lookups and authorization checks
#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(user_repository: UserRepository) -> Self {
        Self { user_repository }
    }

    /// Get user by ID
    pub async fn get_user_by_id(&self, user_id: i64) -> Result<User> {
        debug!(user_id = user_id, "Getting user by ID");
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(RideLinkError::UserNotFound { user_id })
    }

    /// Get user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<User> {
        debug!(email = %email, "Getting user by email");
        self.user_repository
            .find_by_email(email)
            .await?
            .ok_or_else(|| RideLinkError::UserEmailNotFound {
                email: email.to_string(),
            })
    }

    /// Check whether a user holds the administrative role
    pub async fn is_admin(&self, user_id: i64) -> Result<bool> {
        Ok(self.get_user_by_id(user_id).await?.is_admin())
    }

    /// Register a new user profile
    pub async fn register_user(&self, request: CreateUserRequest) -> Result<User> {
        if !is_valid_email(&request.email) {
            return Err(RideLinkError::InvalidInput(format!(
                "Invalid email address: {}",
                request.email
            )));
        }
        if request.name.trim().is_empty() {
            return Err(RideLinkError::InvalidInput("Name is required".to_string()));
        }

        let user = self.user_repository.create(request).await?;
        info!(user_id = user.id, "New user registered successfully");

        Ok(user)
    }

    /// List users with pagination
    pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        if limit > 100 {
            return Err(RideLinkError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }

        self.user_repository.list(limit, offset).await
    }
}
