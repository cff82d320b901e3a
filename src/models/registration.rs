//! Registration model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: Uuid,
    pub session_id: Uuid,
    pub student_id: Uuid,
    pub date: NaiveDate,
    pub status: String,
    pub locked_by_teacher_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl Registration {
    pub fn is_locked(&self) -> bool {
        self.status == RegistrationStatus::Locked.as_str()
    }
}

/// Per-(student, date) registration states. A student moves a registration
/// between sessions while `selected`; `locked` fixes the choice until the
/// locking teacher or an admin releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationStatus {
    Selected,
    Locked,
    Assigned,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Selected => "selected",
            RegistrationStatus::Locked => "locked",
            RegistrationStatus::Assigned => "assigned",
        }
    }

    pub fn parse(value: &str) -> Option<RegistrationStatus> {
        match value {
            "selected" => Some(RegistrationStatus::Selected),
            "locked" => Some(RegistrationStatus::Locked),
            "assigned" => Some(RegistrationStatus::Assigned),
            _ => None,
        }
    }
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration joined with its student, for teacher rosters
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RosterEntry {
    pub registration_id: Uuid,
    pub status: String,
    pub locked_by_teacher_id: Option<Uuid>,
    pub student_id: Uuid,
    pub student_name: String,
    pub student_email: String,
    pub grade: Option<i32>,
    pub homeroom: Option<String>,
}

/// Registration joined with its session, for the student's own listing
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentRegistration {
    pub registration_id: Uuid,
    pub status: String,
    pub locked_by_teacher_id: Option<Uuid>,
    pub date: NaiveDate,
    pub session_id: Uuid,
    pub title: String,
    pub room_number: String,
    pub teacher_name: String,
    pub flex_type: String,
    pub selection_deadline: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            RegistrationStatus::Selected,
            RegistrationStatus::Locked,
            RegistrationStatus::Assigned,
        ] {
            assert_eq!(RegistrationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RegistrationStatus::parse("pending"), None);
    }
}
