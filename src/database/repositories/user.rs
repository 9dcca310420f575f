//! User repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::user::{CreateUserRequest, User, ROLE_USER};
use crate::utils::errors::RideLinkError;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, RideLinkError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role, vehicle_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, name, role, vehicle_type, created_at
            "#,
        )
        .bind(request.email)
        .bind(request.name)
        .bind(request.role.unwrap_or_else(|| ROLE_USER.to_string()))
        .bind(request.vehicle_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, RideLinkError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, vehicle_type, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RideLinkError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, vehicle_type, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, RideLinkError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, name, role, vehicle_type, created_at FROM users ORDER BY id ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
