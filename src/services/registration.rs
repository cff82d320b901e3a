//! Registration workflow implementation
//!
//! This is the state machine per (student, flex date):
//! `unregistered → selected → locked`, with `locked → selected` via unlock and
//! deletion forbidden from `locked`. Selecting replaces any prior registration
//! for the date; locking removes competing registrations and overrides student
//! choice until released.

use crate::config::settings::Settings;
use crate::database::repositories::{
    AuditRepository, FlexDateRepository, RegistrationRepository, SessionRepository, UserRepository,
};
use crate::models::registration::{Registration, StudentRegistration};
use crate::models::user::Role;
use crate::services::email::{EmailClient, EmailOutcome, RemovalNotice};
use crate::services::identity::{require_staff, Caller};
use crate::services::notification::NotificationService;
use crate::utils::errors::{FlexTimeError, Result};
use crate::utils::logging::{log_admin_action, log_registration_event};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

/// Result of a Remove operation; the email outcome rides along because
/// delivery failure does not fail the removal.
#[derive(Debug, Clone)]
pub struct RemovalReceipt {
    pub email: EmailOutcome,
}

/// Registration workflow service
#[derive(Debug, Clone)]
pub struct RegistrationService {
    registrations: RegistrationRepository,
    sessions: SessionRepository,
    flex_dates: FlexDateRepository,
    users: UserRepository,
    notifications: NotificationService,
    email: EmailClient,
    audit: AuditRepository,
    settings: Settings,
}

impl RegistrationService {
    /// Create a new RegistrationService instance
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        registrations: RegistrationRepository,
        sessions: SessionRepository,
        flex_dates: FlexDateRepository,
        users: UserRepository,
        notifications: NotificationService,
        email: EmailClient,
        audit: AuditRepository,
        settings: Settings,
    ) -> Self {
        Self {
            registrations,
            sessions,
            flex_dates,
            users,
            notifications,
            email,
            audit,
            settings,
        }
    }

    /// Select a session for its flex date, replacing any prior selection for
    /// that date. The replace and the capacity check share one transaction.
    pub async fn select(&self, caller: &Caller, session_id: Uuid) -> Result<Registration> {
        if caller.role != Role::Student {
            return Err(FlexTimeError::Forbidden(
                "Only students can select sessions".to_string(),
            ));
        }

        let student = self
            .users
            .find_by_id(caller.id)
            .await?
            .ok_or(FlexTimeError::UserNotFound { user_id: caller.id })?;

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(FlexTimeError::SessionNotFound { session_id })?;

        let flex_date = self
            .flex_dates
            .find_by_date(session.date)
            .await?
            .ok_or_else(|| FlexTimeError::FlexDateNotFound {
                reference: session.date.to_string(),
            })?;

        let now = Utc::now();
        let window_days = self.settings.scheduling.selection_window_days;
        if !selection_window_contains(now.date_naive(), session.date, window_days) {
            return Err(FlexTimeError::Validation(format!(
                "Selections are limited to the next {} days",
                window_days
            )));
        }

        if flex_date.is_locked {
            return Err(FlexTimeError::Validation(
                "Registration changes for this date are closed".to_string(),
            ));
        }

        if deadline_passed(now, flex_date.selection_deadline) {
            return Err(FlexTimeError::Validation(
                "The selection deadline for this date has passed".to_string(),
            ));
        }

        let grade = student.grade.ok_or_else(|| {
            FlexTimeError::Validation("No grade is assigned to your account".to_string())
        })?;
        if !grade_allowed(&session.allowed_grades, grade) {
            return Err(FlexTimeError::Validation(
                "This session is not open to your grade".to_string(),
            ));
        }

        if self
            .registrations
            .find_locked_for_date(caller.id, session.date)
            .await?
            .is_some()
        {
            return Err(FlexTimeError::Validation(
                "You are locked to another session for this date".to_string(),
            ));
        }

        let registration = self
            .registrations
            .replace_for_date(caller.id, session.id, session.date, session.capacity)
            .await?
            .ok_or_else(|| FlexTimeError::Conflict("Session full".to_string()))?;

        log_registration_event(caller.id, "select", Some(&session.title));
        Ok(registration)
    }

    /// Cancel the caller's own registration. Locked registrations stay put.
    pub async fn cancel(&self, caller: &Caller, registration_id: Uuid) -> Result<()> {
        let registration = self
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(FlexTimeError::RegistrationNotFound { registration_id })?;

        if registration.student_id != caller.id {
            return Err(FlexTimeError::Forbidden(
                "You can only cancel your own registration".to_string(),
            ));
        }

        if registration.is_locked() {
            return Err(FlexTimeError::Validation(
                "Cannot cancel a locked registration".to_string(),
            ));
        }

        self.registrations.delete(registration_id).await?;
        log_registration_event(caller.id, "cancel", None);
        Ok(())
    }

    /// Lock a student to a session, overriding their own choice for the date.
    /// Only the owning teacher or an admin may lock.
    pub async fn lock(
        &self,
        caller: &Caller,
        student_id: Uuid,
        session_id: Uuid,
    ) -> Result<Registration> {
        require_staff(caller)?;

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or(FlexTimeError::SessionNotFound { session_id })?;

        if caller.role == Role::Teacher && session.teacher_id != caller.id {
            return Err(FlexTimeError::Forbidden(
                "You can only lock students to your own sessions".to_string(),
            ));
        }

        let student = self
            .users
            .find_by_id(student_id)
            .await?
            .ok_or(FlexTimeError::UserNotFound { user_id: student_id })?;

        if let Some(existing) = self
            .registrations
            .find_locked_for_date(student_id, session.date)
            .await?
        {
            if existing.session_id != session.id {
                let holder = match existing.locked_by_teacher_id {
                    Some(teacher_id) => self
                        .users
                        .find_by_id(teacher_id)
                        .await?
                        .map(|teacher| teacher.name),
                    None => None,
                };
                return Err(FlexTimeError::Conflict(format!(
                    "Already locked by {}",
                    holder.unwrap_or_else(|| "another teacher".to_string())
                )));
            }
        }

        let registration = self
            .registrations
            .lock_to_session(student_id, session.id, session.date, caller.id)
            .await?;

        self.notifications
            .notify_locked(student.id, &session)
            .await?;

        log_admin_action(
            caller.id,
            "lock_student",
            Some(&student_id.to_string()),
            Some(&session.title),
        );
        Ok(registration)
    }

    /// Release a locked registration back to `selected`. Only the locking
    /// teacher or an admin may unlock; unlocking a non-locked registration
    /// fails without touching state.
    pub async fn unlock(&self, caller: &Caller, registration_id: Uuid) -> Result<Registration> {
        let registration = self
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(FlexTimeError::RegistrationNotFound { registration_id })?;

        if !registration.is_locked() {
            return Err(FlexTimeError::Validation(
                "Registration is not locked".to_string(),
            ));
        }

        if !caller.is_admin() && registration.locked_by_teacher_id != Some(caller.id) {
            return Err(FlexTimeError::Forbidden(
                "Only the locking teacher or an admin can unlock".to_string(),
            ));
        }

        let registration = self.registrations.unlock(registration_id).await?;
        log_admin_action(caller.id, "unlock_student", None, None);
        Ok(registration)
    }

    /// Remove a student from a session. Records a notification, attempts one
    /// best-effort email, and writes an audit entry; the email result never
    /// rolls back the removal.
    pub async fn remove(&self, caller: &Caller, registration_id: Uuid) -> Result<RemovalReceipt> {
        require_staff(caller)?;

        let registration = self
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or(FlexTimeError::RegistrationNotFound { registration_id })?;

        let session = self
            .sessions
            .find_by_id(registration.session_id)
            .await?
            .ok_or(FlexTimeError::SessionNotFound {
                session_id: registration.session_id,
            })?;

        if caller.role == Role::Teacher && session.teacher_id != caller.id {
            return Err(FlexTimeError::Forbidden(
                "You can only remove students from your own sessions".to_string(),
            ));
        }

        let student = self
            .users
            .find_by_id(registration.student_id)
            .await?
            .ok_or(FlexTimeError::UserNotFound {
                user_id: registration.student_id,
            })?;

        let teacher = self
            .users
            .find_by_id(session.teacher_id)
            .await?
            .ok_or(FlexTimeError::UserNotFound {
                user_id: session.teacher_id,
            })?;

        let flex_date = self
            .flex_dates
            .find_by_date(session.date)
            .await?
            .ok_or_else(|| FlexTimeError::FlexDateNotFound {
                reference: session.date.to_string(),
            })?;

        self.registrations.delete(registration_id).await?;

        self.notifications
            .notify_removed(student.id, &session)
            .await?;

        let email = self
            .email
            .try_send_removal_notice(&RemovalNotice {
                student_email: student.email.clone(),
                student_name: student.name.clone(),
                session_title: session.title.clone(),
                teacher_name: teacher.name.clone(),
                room_number: session.room_number.clone(),
                flex_date: session.date,
                selection_deadline: flex_date.selection_deadline,
            })
            .await;

        self.audit
            .record(
                caller.id,
                "remove_student",
                serde_json::json!({
                    "registration_id": registration_id,
                    "student_id": student.id,
                    "session_id": session.id,
                    "session_title": session.title,
                }),
            )
            .await?;

        log_admin_action(
            caller.id,
            "remove_student",
            Some(&student.id.to_string()),
            Some(&session.title),
        );
        Ok(RemovalReceipt { email })
    }

    /// The caller's upcoming registrations with session context
    pub async fn my_registrations(&self, caller: &Caller) -> Result<Vec<StudentRegistration>> {
        self.registrations
            .list_for_student(caller.id, Utc::now().date_naive())
            .await
    }
}

/// Students may only register for dates in `today ..= today + window_days`
fn selection_window_contains(today: NaiveDate, date: NaiveDate, window_days: i64) -> bool {
    date >= today && date <= today + Duration::days(window_days)
}

fn deadline_passed(now: DateTime<Utc>, deadline: DateTime<Utc>) -> bool {
    now > deadline
}

fn grade_allowed(allowed_grades: &[i32], grade: i32) -> bool {
    allowed_grades.contains(&grade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_selection_window_bounds() {
        let today = day(2025, 1, 6);
        assert!(selection_window_contains(today, today, 7));
        assert!(selection_window_contains(today, day(2025, 1, 13), 7));
        assert!(!selection_window_contains(today, day(2025, 1, 14), 7));
        assert!(!selection_window_contains(today, day(2025, 1, 5), 7));
    }

    #[test]
    fn test_deadline_boundary() {
        let deadline = Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap();
        let just_before = Utc.with_ymd_and_hms(2025, 1, 10, 7, 59, 59).unwrap();
        let just_after = Utc.with_ymd_and_hms(2025, 1, 10, 8, 1, 0).unwrap();

        assert!(!deadline_passed(just_before, deadline));
        assert!(!deadline_passed(deadline, deadline));
        assert!(deadline_passed(just_after, deadline));
    }

    #[test]
    fn test_grade_eligibility() {
        let allowed = vec![9, 10];
        assert!(grade_allowed(&allowed, 9));
        assert!(grade_allowed(&allowed, 10));
        assert!(!grade_allowed(&allowed, 11));
        assert!(!grade_allowed(&[], 9));
    }

    proptest! {
        #[test]
        fn prop_window_excludes_past_dates(offset in 1i64..3650) {
            let today = day(2025, 1, 6);
            prop_assert!(!selection_window_contains(today, today - Duration::days(offset), 7));
        }

        #[test]
        fn prop_window_matches_offset(offset in 0i64..30, window in 1i64..30) {
            let today = day(2025, 1, 6);
            let inside = selection_window_contains(today, today + Duration::days(offset), window);
            prop_assert_eq!(inside, offset <= window);
        }
    }
}
