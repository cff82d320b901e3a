//! Session catalog service implementation
//!
//! Teachers author sessions against flex dates; this service handles creation
//! (including recurring expansion and templates), deletion, availability
//! listings, and rosters.

use crate::config::settings::{SchedulingConfig, Settings};
use crate::database::repositories::{
    FlexDateRepository, NewSession, RegistrationRepository, SessionRepository, UserRepository,
};
use crate::models::registration::RosterEntry;
use crate::models::session::{
    AvailableSessions, CreateSessionRequest, Session, SessionAvailability, SessionTemplate,
};
use crate::models::user::Role;
use crate::services::identity::Caller;
use crate::utils::errors::{FlexTimeError, Result};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Session catalog service
#[derive(Debug, Clone)]
pub struct SessionService {
    sessions: SessionRepository,
    flex_dates: FlexDateRepository,
    registrations: RegistrationRepository,
    users: UserRepository,
    settings: Settings,
}

impl SessionService {
    /// Create a new SessionService instance
    pub fn new(
        sessions: SessionRepository,
        flex_dates: FlexDateRepository,
        registrations: RegistrationRepository,
        users: UserRepository,
        settings: Settings,
    ) -> Self {
        Self {
            sessions,
            flex_dates,
            registrations,
            users,
            settings,
        }
    }

    /// Create one session, or one per future flex date of the same type when
    /// `recurring` is set. A teacher gets at most one session per date.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateSessionRequest,
    ) -> Result<Vec<Session>> {
        if caller.role != Role::Teacher {
            return Err(FlexTimeError::Forbidden(
                "Only teachers can create sessions".to_string(),
            ));
        }

        validate_session_request(&request, &self.settings.scheduling)?;

        let flex_date = self
            .flex_dates
            .find_by_date(request.date)
            .await?
            .ok_or_else(|| FlexTimeError::FlexDateNotFound {
                reference: request.date.to_string(),
            })?;

        if self
            .sessions
            .find_by_teacher_and_date(caller.id, request.date)
            .await?
            .is_some()
        {
            return Err(FlexTimeError::Conflict(
                "You already have a session on this date".to_string(),
            ));
        }

        let dates: Vec<NaiveDate> = if request.recurring {
            self.flex_dates
                .list_same_type_from(&flex_date.flex_type, request.date)
                .await?
                .into_iter()
                .map(|fd| fd.date)
                .collect()
        } else {
            vec![request.date]
        };

        let template_id = if request.save_as_template && self.settings.features.session_templates {
            let name = request.template_name.as_deref().ok_or_else(|| {
                FlexTimeError::Validation("Template name is required".to_string())
            })?;
            let template = self
                .sessions
                .create_template(
                    caller.id,
                    name,
                    &request.room_number,
                    request.capacity,
                    &request.title,
                    request.long_description.as_deref(),
                    &request.allowed_grades,
                )
                .await?;
            Some(template.id)
        } else {
            None
        };

        let rows = dates
            .into_iter()
            .map(|date| NewSession {
                date,
                teacher_id: caller.id,
                room_number: request.room_number.clone(),
                capacity: request.capacity,
                title: request.title.clone(),
                long_description: request.long_description.clone(),
                allowed_grades: request.allowed_grades.clone(),
                created_from_template_id: template_id,
            })
            .collect();

        let created = self.sessions.create_many(rows).await?;
        info!(
            teacher_id = %caller.id,
            count = created.len(),
            title = %request.title,
            "Sessions created"
        );
        Ok(created)
    }

    /// Delete a session. Registrations go with it via the schema's cascade.
    pub async fn delete(&self, caller: &Caller, session_id: Uuid) -> Result<()> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(FlexTimeError::SessionNotFound { session_id })?;

        if session.teacher_id != caller.id && !caller.is_admin() {
            return Err(FlexTimeError::Forbidden(
                "You can only delete your own sessions".to_string(),
            ));
        }

        self.sessions.delete(session_id).await?;
        info!(caller_id = %caller.id, session_id = %session_id, "Session deleted");
        Ok(())
    }

    /// Sessions offered on a date, with enrollment counts and the caller's own
    /// registration. Students only see sessions open to their grade.
    pub async fn available(&self, caller: &Caller, date: NaiveDate) -> Result<AvailableSessions> {
        let flex_date = self
            .flex_dates
            .find_by_date(date)
            .await?
            .ok_or_else(|| FlexTimeError::FlexDateNotFound {
                reference: date.to_string(),
            })?;

        let mut sessions = self.sessions.list_by_date(date).await?;

        if caller.role == Role::Student {
            let student = self
                .users
                .find_by_id(caller.id)
                .await?
                .ok_or(FlexTimeError::UserNotFound { user_id: caller.id })?;
            if let Some(grade) = student.grade {
                sessions.retain(|s| s.allowed_grades.contains(&grade));
            }
        }

        let mut teacher_names: HashMap<Uuid, Option<String>> = HashMap::new();
        let mut listings = Vec::with_capacity(sessions.len());
        for session in sessions {
            let enrolled = self.registrations.count_for_session(session.id).await?;

            let teacher_name = match teacher_names.get(&session.teacher_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .users
                        .find_by_id(session.teacher_id)
                        .await?
                        .map(|teacher| teacher.name);
                    teacher_names.insert(session.teacher_id, name.clone());
                    name
                }
            };

            listings.push(SessionAvailability {
                is_full: enrolled >= session.capacity as i64,
                session,
                teacher_name,
                enrolled,
            });
        }

        let my_registration = self
            .registrations
            .find_by_student_and_date(caller.id, date)
            .await?;

        let can_select = Utc::now() < flex_date.selection_deadline && !flex_date.is_locked;

        debug!(caller_id = %caller.id, date = %date, sessions = listings.len(), "Availability listed");
        Ok(AvailableSessions {
            flex_date,
            sessions: listings,
            my_registration,
            can_select,
        })
    }

    /// The registered students for a session, owner or admin only
    pub async fn roster(&self, caller: &Caller, session_id: Uuid) -> Result<Vec<RosterEntry>> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(FlexTimeError::SessionNotFound { session_id })?;

        if session.teacher_id != caller.id && !caller.is_admin() {
            return Err(FlexTimeError::Forbidden(
                "You can only view rosters for your own sessions".to_string(),
            ));
        }

        self.registrations.roster_for_session(session_id).await
    }

    /// The calling teacher's upcoming sessions
    pub async fn my_sessions(&self, caller: &Caller) -> Result<Vec<Session>> {
        if caller.role != Role::Teacher {
            return Err(FlexTimeError::Forbidden(
                "Only teachers have their own sessions".to_string(),
            ));
        }

        self.sessions
            .list_by_teacher(caller.id, Utc::now().date_naive())
            .await
    }

    /// The calling teacher's saved templates
    pub async fn templates(&self, caller: &Caller) -> Result<Vec<SessionTemplate>> {
        if caller.role != Role::Teacher {
            return Err(FlexTimeError::Forbidden(
                "Only teachers have session templates".to_string(),
            ));
        }

        self.sessions.list_templates(caller.id).await
    }
}

/// Field-level checks on a session creation request
fn validate_session_request(
    request: &CreateSessionRequest,
    scheduling: &SchedulingConfig,
) -> Result<()> {
    if request.title.trim().is_empty() || request.room_number.trim().is_empty() {
        return Err(FlexTimeError::Validation(
            "Missing required fields".to_string(),
        ));
    }

    if request.capacity < 1 {
        return Err(FlexTimeError::Validation(
            "Capacity must be at least 1".to_string(),
        ));
    }

    if request.allowed_grades.is_empty() {
        return Err(FlexTimeError::Validation(
            "At least one grade must be allowed".to_string(),
        ));
    }

    if request
        .allowed_grades
        .iter()
        .any(|&g| g < scheduling.min_grade || g > scheduling.max_grade)
    {
        return Err(FlexTimeError::Validation(format!(
            "Grades must be between {} and {}",
            scheduling.min_grade, scheduling.max_grade
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn scheduling() -> SchedulingConfig {
        Settings::default().scheduling
    }

    fn request() -> CreateSessionRequest {
        CreateSessionRequest {
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            room_number: "214".to_string(),
            capacity: 25,
            title: "Robotics Lab".to_string(),
            long_description: None,
            allowed_grades: vec![9, 10, 11, 12],
            recurring: false,
            save_as_template: false,
            template_name: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_session_request(&request(), &scheduling()).is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut request = request();
        request.title = "  ".to_string();
        assert_matches!(
            validate_session_request(&request, &scheduling()),
            Err(FlexTimeError::Validation(msg)) if msg.contains("required")
        );
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut request = request();
        request.capacity = 0;
        assert_matches!(
            validate_session_request(&request, &scheduling()),
            Err(FlexTimeError::Validation(msg)) if msg.contains("Capacity")
        );
    }

    #[test]
    fn test_empty_grades_rejected() {
        let mut request = request();
        request.allowed_grades.clear();
        assert_matches!(
            validate_session_request(&request, &scheduling()),
            Err(FlexTimeError::Validation(msg)) if msg.contains("grade")
        );
    }

    #[test]
    fn test_out_of_range_grade_rejected() {
        let mut request = request();
        request.allowed_grades = vec![8];
        assert_matches!(
            validate_session_request(&request, &scheduling()),
            Err(FlexTimeError::Validation(msg)) if msg.contains("between 9 and 12")
        );
    }
}
