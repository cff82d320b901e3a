//! Session and session template models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub date: NaiveDate,
    pub teacher_id: Uuid,
    pub room_number: String,
    pub capacity: i32,
    pub title: String,
    pub long_description: Option<String>,
    pub allowed_grades: Vec<i32>,
    pub created_from_template_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionTemplate {
    pub id: Uuid,
    pub teacher_id: Uuid,
    pub name: String,
    pub room_number: String,
    pub capacity: i32,
    pub title: String,
    pub long_description: Option<String>,
    pub allowed_grades: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    pub date: NaiveDate,
    pub room_number: String,
    pub capacity: i32,
    pub title: String,
    pub long_description: Option<String>,
    pub allowed_grades: Vec<i32>,
    /// Also create the session on every future flex date of the same type
    pub recurring: bool,
    pub save_as_template: bool,
    pub template_name: Option<String>,
}

/// One session in the availability listing, with enrollment attached
#[derive(Debug, Clone, Serialize)]
pub struct SessionAvailability {
    pub session: Session,
    pub teacher_name: Option<String>,
    pub enrolled: i64,
    pub is_full: bool,
}

/// Everything a caller needs to pick a session for one date
#[derive(Debug, Clone, Serialize)]
pub struct AvailableSessions {
    pub flex_date: super::flex_date::FlexDate,
    pub sessions: Vec<SessionAvailability>,
    pub my_registration: Option<super::registration::Registration>,
    pub can_select: bool,
}
