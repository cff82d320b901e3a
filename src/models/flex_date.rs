//! Flex date model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlexDate {
    pub id: Uuid,
    pub date: NaiveDate,
    pub flex_type: String,
    pub duration_minutes: i32,
    pub selection_deadline: DateTime<Utc>,
    pub is_locked: bool,
    pub created_at: DateTime<Utc>,
}

/// The two kinds of flex period on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlexType {
    Access,
    StudyTime,
}

impl FlexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlexType::Access => "ACCESS",
            FlexType::StudyTime => "STUDY TIME",
        }
    }

    pub fn parse(value: &str) -> Option<FlexType> {
        match value {
            "ACCESS" => Some(FlexType::Access),
            "STUDY TIME" => Some(FlexType::StudyTime),
            _ => None,
        }
    }
}

impl std::fmt::Display for FlexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFlexDateRequest {
    pub date: NaiveDate,
    pub flex_type: String,
    pub duration_minutes: i32,
    pub selection_deadline: DateTime<Utc>,
    pub is_locked: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFlexDateRequest {
    pub flex_type: Option<String>,
    pub duration_minutes: Option<i32>,
    pub selection_deadline: Option<DateTime<Utc>>,
    pub is_locked: Option<bool>,
}

impl UpdateFlexDateRequest {
    pub fn is_empty(&self) -> bool {
        self.flex_type.is_none()
            && self.duration_minutes.is_none()
            && self.selection_deadline.is_none()
            && self.is_locked.is_none()
    }
}

/// Flex date with aggregate counts for the admin listing
#[derive(Debug, Clone, Serialize)]
pub struct FlexDateOverview {
    pub flex_date: FlexDate,
    pub session_count: i64,
    pub registration_count: i64,
}

/// Upcoming flex date as seen by one caller
#[derive(Debug, Clone, Serialize)]
pub struct UpcomingFlexDate {
    pub flex_date: FlexDate,
    pub total_sessions: i64,
    pub students_registered: i64,
    pub my_registration: Option<super::registration::Registration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flex_type_round_trip() {
        assert_eq!(FlexType::parse("ACCESS"), Some(FlexType::Access));
        assert_eq!(FlexType::parse("STUDY TIME"), Some(FlexType::StudyTime));
        assert_eq!(FlexType::parse("STUDY_TIME"), None);
        assert_eq!(FlexType::StudyTime.as_str(), "STUDY TIME");
    }
}
