//! Notification service implementation
//!
//! This service records student-facing notifications for registration changes
//! and serves the student's notification feed.

use crate::database::repositories::NotificationRepository;
use crate::models::notification::{CreateNotificationRequest, Notification, NotificationType};
use crate::models::session::Session;
use crate::services::identity::Caller;
use crate::utils::errors::{FlexTimeError, Result};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

const DEFAULT_FEED_LIMIT: i64 = 50;
const MAX_FEED_LIMIT: i64 = 100;

/// A student's notification feed with its unread count
#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// Notification service for registration change messages
#[derive(Debug, Clone)]
pub struct NotificationService {
    notifications: NotificationRepository,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(notifications: NotificationRepository) -> Self {
        Self { notifications }
    }

    /// Record a `locked` notification for a student
    pub async fn notify_locked(&self, student_id: Uuid, session: &Session) -> Result<Notification> {
        let notification = self
            .notifications
            .create(CreateNotificationRequest {
                student_id,
                kind: NotificationType::Locked,
                session_id: Some(session.id),
                flex_date: Some(session.date),
                message: locked_message(&session.title),
            })
            .await?;

        info!(student_id = %student_id, session_id = %session.id, "Locked notification recorded");
        Ok(notification)
    }

    /// Record a `removed` notification for a student
    pub async fn notify_removed(&self, student_id: Uuid, session: &Session) -> Result<Notification> {
        let notification = self
            .notifications
            .create(CreateNotificationRequest {
                student_id,
                kind: NotificationType::Removed,
                session_id: Some(session.id),
                flex_date: Some(session.date),
                message: removed_message(&session.title),
            })
            .await?;

        info!(student_id = %student_id, session_id = %session.id, "Removed notification recorded");
        Ok(notification)
    }

    /// Record a system notification for a student
    pub async fn notify_system(&self, student_id: Uuid, message: String) -> Result<Notification> {
        self.notifications
            .create(CreateNotificationRequest {
                student_id,
                kind: NotificationType::System,
                session_id: None,
                flex_date: None,
                message,
            })
            .await
    }

    /// The caller's own notification feed, newest first
    pub async fn my_notifications(
        &self,
        caller: &Caller,
        unread_only: bool,
        limit: Option<i64>,
    ) -> Result<NotificationFeed> {
        let limit = limit.unwrap_or(DEFAULT_FEED_LIMIT);
        if limit <= 0 || limit > MAX_FEED_LIMIT {
            return Err(FlexTimeError::Validation(format!(
                "Limit must be between 1 and {}",
                MAX_FEED_LIMIT
            )));
        }

        debug!(caller_id = %caller.id, unread_only = unread_only, "Fetching notification feed");

        let notifications = self
            .notifications
            .list_for_student(caller.id, unread_only, limit)
            .await?;
        let unread_count = self.notifications.unread_count(caller.id).await?;

        Ok(NotificationFeed {
            notifications,
            unread_count,
        })
    }

    /// Mark one of the caller's notifications as read
    pub async fn mark_read(&self, caller: &Caller, notification_id: Uuid) -> Result<Notification> {
        let notification = self
            .notifications
            .find_by_id(notification_id)
            .await?
            .ok_or(FlexTimeError::NotificationNotFound { notification_id })?;

        if notification.student_id != caller.id {
            return Err(FlexTimeError::Forbidden(
                "You can only mark your own notifications as read".to_string(),
            ));
        }

        self.notifications.mark_read(notification_id).await
    }

    /// Mark all of the caller's notifications as read
    pub async fn mark_all_read(&self, caller: &Caller) -> Result<u64> {
        let updated = self.notifications.mark_all_read(caller.id).await?;
        debug!(caller_id = %caller.id, updated = updated, "Marked all notifications as read");
        Ok(updated)
    }
}

/// Message recorded when a teacher locks a student to a session
pub fn locked_message(session_title: &str) -> String {
    format!(
        "You have been locked to {}. You cannot change this selection.",
        session_title
    )
}

/// Message recorded when a student is removed from a session
pub fn removed_message(session_title: &str) -> String {
    format!(
        "You have been removed from {}. Please select another session.",
        session_title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_message() {
        assert_eq!(
            locked_message("Robotics Lab"),
            "You have been locked to Robotics Lab. You cannot change this selection."
        );
    }

    #[test]
    fn test_removed_message() {
        assert_eq!(
            removed_message("Robotics Lab"),
            "You have been removed from Robotics Lab. Please select another session."
        );
    }
}
