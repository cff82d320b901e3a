//! User directory service implementation
//!
//! Admin-facing account management: listing, edits, deletion, and the
//! dashboard statistics. Role and grade drive eligibility everywhere else, so
//! edits keep them coherent (non-students never carry a grade or homeroom).

use crate::database::repositories::{
    AuditRepository, FlexDateRepository, RegistrationRepository, SessionRepository, UserRepository,
};
use crate::models::user::{Role, UpdateUserRequest, User, UserFilter};
use crate::services::identity::{require_admin, Caller};
use crate::utils::errors::{FlexTimeError, Result};
use crate::utils::logging::log_admin_action;
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Dashboard statistics for the admin overview
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryStats {
    pub total_users: i64,
    pub students: i64,
    pub teachers: i64,
    pub upcoming_flex_dates: i64,
    pub over_capacity_sessions: i64,
    pub empty_sessions: i64,
    pub students_without_selection: i64,
}

/// User directory service
#[derive(Debug, Clone)]
pub struct UserService {
    users: UserRepository,
    flex_dates: FlexDateRepository,
    sessions: SessionRepository,
    registrations: RegistrationRepository,
    audit: AuditRepository,
}

impl UserService {
    /// Create a new UserService instance
    pub fn new(
        users: UserRepository,
        flex_dates: FlexDateRepository,
        sessions: SessionRepository,
        registrations: RegistrationRepository,
        audit: AuditRepository,
    ) -> Self {
        Self {
            users,
            flex_dates,
            sessions,
            registrations,
            audit,
        }
    }

    /// List users with role filter and name/email search, admin only
    pub async fn list(&self, caller: &Caller, filter: UserFilter) -> Result<Vec<User>> {
        require_admin(caller)?;

        if let Some(search) = &filter.search {
            if search.len() < 2 {
                return Err(FlexTimeError::Validation(
                    "Search pattern must be at least 2 characters".to_string(),
                ));
            }
        }

        debug!(caller_id = %caller.id, role = ?filter.role, "Listing users");
        self.users.list(&filter).await
    }

    /// Update an account. A role change away from student clears grade and
    /// homeroom; otherwise omitted fields keep their current values.
    pub async fn update(
        &self,
        caller: &Caller,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<User> {
        require_admin(caller)?;

        if request.is_empty() {
            return Err(FlexTimeError::Validation("No fields to update".to_string()));
        }

        if let Some(role) = &request.role {
            Role::parse(role)
                .ok_or_else(|| FlexTimeError::Validation(format!("Invalid role: {}", role)))?;
        }

        let existing = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FlexTimeError::UserNotFound { user_id })?;

        let role_after = request.role.clone().unwrap_or_else(|| existing.role.clone());
        let (grade, homeroom) = if role_after == Role::Student.as_str() {
            (
                request.grade.or(existing.grade),
                request.homeroom.clone().or(existing.homeroom.clone()),
            )
        } else {
            (None, None)
        };

        let effective = UpdateUserRequest {
            name: request.name,
            role: request.role,
            grade,
            homeroom,
        };

        let user = self.users.update(user_id, effective).await?;

        self.audit
            .record(
                caller.id,
                "update_user",
                serde_json::json!({ "updated_user_id": user_id }),
            )
            .await?;

        log_admin_action(caller.id, "update_user", Some(&user_id.to_string()), None);
        Ok(user)
    }

    /// Delete an account. Admins cannot delete themselves, and teachers must
    /// hand off their sessions first; dependent rows cascade at the schema.
    pub async fn delete(&self, caller: &Caller, user_id: Uuid) -> Result<()> {
        require_admin(caller)?;

        if user_id == caller.id {
            return Err(FlexTimeError::Validation(
                "Cannot delete your own account".to_string(),
            ));
        }

        let target = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FlexTimeError::UserNotFound { user_id })?;

        if target.role() == Some(Role::Teacher) {
            let session_count = self.sessions.count_for_teacher(user_id).await?;
            if session_count > 0 {
                return Err(FlexTimeError::Conflict(format!(
                    "Cannot delete. Teacher has {} session(s). Delete or reassign sessions first.",
                    session_count
                )));
            }
        }

        self.users.delete(user_id).await?;

        self.audit
            .record(
                caller.id,
                "delete_user",
                serde_json::json!({
                    "deleted_user_id": user_id,
                    "email": target.email,
                }),
            )
            .await?;

        log_admin_action(caller.id, "delete_user", Some(&target.email), None);
        Ok(())
    }

    /// Dashboard overview statistics, admin only
    pub async fn stats(&self, caller: &Caller) -> Result<DirectoryStats> {
        require_admin(caller)?;

        let total_users = self.users.count().await?;
        let students = self.users.count_by_role(Role::Student.as_str()).await?;
        let teachers = self.users.count_by_role(Role::Teacher.as_str()).await?;

        let today = Utc::now().date_naive();
        let upcoming_flex_dates = self
            .flex_dates
            .count_between(today, today + Duration::days(30))
            .await?;

        let mut over_capacity_sessions = 0;
        let mut empty_sessions = 0;
        for session in self.sessions.list_from(today).await? {
            let enrolled = self.registrations.count_for_session(session.id).await?;
            if enrolled > session.capacity as i64 {
                over_capacity_sessions += 1;
            }
            if enrolled == 0 {
                empty_sessions += 1;
            }
        }

        let students_without_selection = match self.flex_dates.next_on_or_after(today).await? {
            Some(next) => {
                let registered = self
                    .registrations
                    .students_registered_on(next.date)
                    .await?;
                (students - registered).max(0)
            }
            None => 0,
        };

        Ok(DirectoryStats {
            total_users,
            students,
            teachers,
            upcoming_flex_dates,
            over_capacity_sessions,
            empty_sessions,
            students_without_selection,
        })
    }
}
