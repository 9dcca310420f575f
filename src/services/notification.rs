//! Notification service implementation
//!
//! Notifications are persisted per user and surfaced by the (out of scope)
//! delivery layer. Ride operations dispatch them through [`NotificationService::dispatch`],
//! which swallows and logs failures: a notification must never fail the
//! operation that triggered it.

use tracing::{debug, error, info};
use uuid::Uuid;

use crate::database::repositories::NotificationRepository;
use crate::models::notification::{CreateNotificationRequest, Notification, NotificationSeverity};
use crate::utils::errors::Result;

/// Notification service for creating and reading user notifications
#[derive(Clone)]
pub struct NotificationService {
    notification_repository: NotificationRepository,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(notification_repository: NotificationRepository) -> Self {
        Self {
            notification_repository,
        }
    }

    /// Store a notification for a user
    pub async fn notify(
        &self,
        user_id: i64,
        message: impl Into<String>,
        severity: NotificationSeverity,
        related_id: Option<Uuid>,
    ) -> Result<Notification> {
        let request = CreateNotificationRequest {
            user_id,
            message: message.into(),
            severity,
            related_id,
        };

        let notification = self.notification_repository.create(request).await?;
        debug!(
            user_id = user_id,
            notification_id = %notification.id,
            severity = %severity,
            "Notification created"
        );

        Ok(notification)
    }

    /// Best-effort dispatch: failures are logged, never propagated to the
    /// caller of the triggering operation.
    pub async fn dispatch(
        &self,
        user_id: i64,
        message: impl Into<String>,
        severity: NotificationSeverity,
        related_id: Option<Uuid>,
    ) {
        if let Err(e) = self.notify(user_id, message, severity, related_id).await {
            error!(user_id = user_id, error = %e, "Failed to send notification");
        }
    }

    /// Notifications for a user, newest first
    pub async fn get_user_notifications(&self, user_id: i64) -> Result<Vec<Notification>> {
        self.notification_repository.find_by_user(user_id).await
    }

    /// Count unread notifications for a user
    pub async fn get_unread_count(&self, user_id: i64) -> Result<i64> {
        self.notification_repository.count_unread(user_id).await
    }

    /// Mark one notification as read
    pub async fn mark_as_read(&self, id: Uuid) -> Result<Notification> {
        self.notification_repository.mark_read(id).await
    }

    /// Mark all of a user's notifications as read
    pub async fn mark_all_as_read(&self, user_id: i64) -> Result<u64> {
        let updated = self.notification_repository.mark_all_read(user_id).await?;
        info!(user_id = user_id, updated = updated, "Marked notifications as read");
        Ok(updated)
    }
}
