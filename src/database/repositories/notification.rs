//! Notification repository implementation

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::{CreateNotificationRequest, Notification};
use crate::utils::errors::RideLinkError;

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a new notification for a user
    pub async fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification, RideLinkError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (id, user_id, message, severity, related_id, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING id, user_id, message, severity, related_id, is_read, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request.user_id)
        .bind(request.message)
        .bind(request.severity.as_str())
        .bind(request.related_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Notifications for a user, newest first
    pub async fn find_by_user(&self, user_id: i64) -> Result<Vec<Notification>, RideLinkError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT id, user_id, message, severity, related_id, is_read, created_at \
             FROM notifications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Count unread notifications for a user
    pub async fn count_unread(&self, user_id: i64) -> Result<i64, RideLinkError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Mark one notification as read
    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, RideLinkError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1
            RETURNING id, user_id, message, severity, related_id, is_read, created_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        notification.ok_or(RideLinkError::NotificationNotFound { id })
    }

    /// Mark all of a user's notifications as read
    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64, RideLinkError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
