//! Notification repository implementation

use crate::models::notification::{CreateNotificationRequest, Notification};
use crate::utils::errors::FlexTimeError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a student-facing notification
    pub async fn create(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification, FlexTimeError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (student_id, type, session_id, flex_date, message, read, created_at)
            VALUES ($1, $2, $3, $4, $5, FALSE, $6)
            RETURNING id, student_id, type, session_id, flex_date, message, read, created_at
            "#,
        )
        .bind(request.student_id)
        .bind(request.kind.as_str())
        .bind(request.session_id)
        .bind(request.flex_date)
        .bind(request.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Find notification by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, FlexTimeError> {
        let notification = sqlx::query_as::<_, Notification>(
            "SELECT id, student_id, type, session_id, flex_date, message, read, created_at FROM notifications WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(notification)
    }

    /// List a student's notifications, newest first
    pub async fn list_for_student(
        &self,
        student_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, FlexTimeError> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, student_id, type, session_id, flex_date, message, read, created_at
            FROM notifications
            WHERE student_id = $1 AND (NOT $2 OR read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
        )
        .bind(student_id)
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    /// Count a student's unread notifications
    pub async fn unread_count(&self, student_id: Uuid) -> Result<i64, FlexTimeError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE student_id = $1 AND read = FALSE",
        )
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }

    /// Mark a notification as read
    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, FlexTimeError> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE id = $1
            RETURNING id, student_id, type, session_id, flex_date, message, read, created_at
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(notification)
    }

    /// Mark all of a student's notifications as read
    pub async fn mark_all_read(&self, student_id: Uuid) -> Result<u64, FlexTimeError> {
        let result =
            sqlx::query("UPDATE notifications SET read = TRUE WHERE student_id = $1 AND read = FALSE")
                .bind(student_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notification_repository_creation() {
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = NotificationRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
