//! Notification model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub student_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub session_id: Option<Uuid>,
    pub flex_date: Option<NaiveDate>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    Removed,
    Locked,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Removed => "removed",
            NotificationType::Locked => "locked",
            NotificationType::System => "system",
        }
    }

    pub fn parse(value: &str) -> Option<NotificationType> {
        match value {
            "removed" => Some(NotificationType::Removed),
            "locked" => Some(NotificationType::Locked),
            "system" => Some(NotificationType::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct CreateNotificationRequest {
    pub student_id: Uuid,
    pub kind: NotificationType,
    pub session_id: Option<Uuid>,
    pub flex_date: Option<NaiveDate>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_round_trip() {
        for kind in [
            NotificationType::Removed,
            NotificationType::Locked,
            NotificationType::System,
        ] {
            assert_eq!(NotificationType::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationType::parse("reminder"), None);
    }
}
