//! Flex date registry service implementation
//!
//! Admins maintain the calendar of flex periods here; everyone reads it
//! through the upcoming listing.

use crate::config::settings::Settings;
use crate::database::repositories::{
    AuditRepository, FlexDateRepository, RegistrationRepository, SessionRepository,
};
use crate::models::flex_date::{
    CreateFlexDateRequest, FlexDate, FlexDateOverview, FlexType, UpcomingFlexDate,
    UpdateFlexDateRequest,
};
use crate::models::user::Role;
use crate::services::identity::{require_admin, Caller};
use crate::utils::errors::{FlexTimeError, Result};
use crate::utils::logging::log_admin_action;
use chrono::{Duration, Utc};
use tracing::debug;
use uuid::Uuid;

/// Staff see the calendar this far ahead; students are held to the
/// configured selection window.
const STAFF_HORIZON_DAYS: i64 = 365;

/// Flex date registry service
#[derive(Debug, Clone)]
pub struct FlexDateService {
    flex_dates: FlexDateRepository,
    sessions: SessionRepository,
    registrations: RegistrationRepository,
    audit: AuditRepository,
    settings: Settings,
}

impl FlexDateService {
    /// Create a new FlexDateService instance
    pub fn new(
        flex_dates: FlexDateRepository,
        sessions: SessionRepository,
        registrations: RegistrationRepository,
        audit: AuditRepository,
        settings: Settings,
    ) -> Self {
        Self {
            flex_dates,
            sessions,
            registrations,
            audit,
            settings,
        }
    }

    /// Create a flex date. Dates are unique; type and duration are checked
    /// against the configured rules.
    pub async fn create(
        &self,
        caller: &Caller,
        request: CreateFlexDateRequest,
    ) -> Result<FlexDate> {
        require_admin(caller)?;

        validate_flex_type(&request.flex_type)?;
        validate_duration(request.duration_minutes, &self.settings.scheduling)?;

        if self.flex_dates.find_by_date(request.date).await?.is_some() {
            return Err(FlexTimeError::Conflict(
                "A flex date already exists for this date".to_string(),
            ));
        }

        let flex_date = self.flex_dates.create(request).await?;

        self.audit
            .record(
                caller.id,
                "create_flex_date",
                serde_json::json!({
                    "flex_date_id": flex_date.id,
                    "date": flex_date.date,
                    "flex_type": flex_date.flex_type,
                }),
            )
            .await?;

        log_admin_action(
            caller.id,
            "create_flex_date",
            Some(&flex_date.date.to_string()),
            None,
        );
        Ok(flex_date)
    }

    /// Partially update a flex date
    pub async fn update(
        &self,
        caller: &Caller,
        flex_date_id: Uuid,
        request: UpdateFlexDateRequest,
    ) -> Result<FlexDate> {
        require_admin(caller)?;

        if request.is_empty() {
            return Err(FlexTimeError::Validation("No fields to update".to_string()));
        }

        if let Some(flex_type) = &request.flex_type {
            validate_flex_type(flex_type)?;
        }
        if let Some(duration) = request.duration_minutes {
            validate_duration(duration, &self.settings.scheduling)?;
        }

        self.flex_dates
            .find_by_id(flex_date_id)
            .await?
            .ok_or_else(|| FlexTimeError::FlexDateNotFound {
                reference: flex_date_id.to_string(),
            })?;

        let flex_date = self.flex_dates.update(flex_date_id, request).await?;

        self.audit
            .record(
                caller.id,
                "update_flex_date",
                serde_json::json!({ "flex_date_id": flex_date_id }),
            )
            .await?;

        Ok(flex_date)
    }

    /// Delete a flex date. Fails while sessions still reference the date.
    pub async fn delete(&self, caller: &Caller, flex_date_id: Uuid) -> Result<()> {
        require_admin(caller)?;

        let flex_date = self
            .flex_dates
            .find_by_id(flex_date_id)
            .await?
            .ok_or_else(|| FlexTimeError::FlexDateNotFound {
                reference: flex_date_id.to_string(),
            })?;

        let session_count = self.sessions.count_for_date(flex_date.date).await?;
        if session_count > 0 {
            return Err(FlexTimeError::Conflict(format!(
                "Cannot delete: {} session(s) exist for this date. Delete sessions first.",
                session_count
            )));
        }

        self.flex_dates.delete(flex_date_id).await?;

        self.audit
            .record(
                caller.id,
                "delete_flex_date",
                serde_json::json!({
                    "flex_date_id": flex_date_id,
                    "date": flex_date.date,
                }),
            )
            .await?;

        log_admin_action(
            caller.id,
            "delete_flex_date",
            Some(&flex_date.date.to_string()),
            None,
        );
        Ok(())
    }

    /// All flex dates with session and registration counts, admin only
    pub async fn list(&self, caller: &Caller) -> Result<Vec<FlexDateOverview>> {
        require_admin(caller)?;

        let flex_dates = self.flex_dates.list().await?;
        let mut overviews = Vec::with_capacity(flex_dates.len());

        for flex_date in flex_dates {
            let session_count = self.sessions.count_for_date(flex_date.date).await?;
            let registration_count = self.registrations.count_for_date(flex_date.date).await?;
            overviews.push(FlexDateOverview {
                flex_date,
                session_count,
                registration_count,
            });
        }

        Ok(overviews)
    }

    /// Upcoming flex dates for the caller. Students see the selection window;
    /// staff see the year ahead. Each date carries the caller's registration.
    pub async fn upcoming(&self, caller: &Caller) -> Result<Vec<UpcomingFlexDate>> {
        let today = Utc::now().date_naive();
        let horizon = if caller.role == Role::Student {
            self.settings.scheduling.selection_window_days
        } else {
            STAFF_HORIZON_DAYS
        };

        let flex_dates = self
            .flex_dates
            .list_between(today, today + Duration::days(horizon))
            .await?;

        let mut upcoming = Vec::with_capacity(flex_dates.len());
        for flex_date in flex_dates {
            let total_sessions = self.sessions.count_for_date(flex_date.date).await?;
            let students_registered = self
                .registrations
                .students_registered_on(flex_date.date)
                .await?;
            let my_registration = if caller.role == Role::Student {
                self.registrations
                    .find_by_student_and_date(caller.id, flex_date.date)
                    .await?
            } else {
                None
            };

            upcoming.push(UpcomingFlexDate {
                flex_date,
                total_sessions,
                students_registered,
                my_registration,
            });
        }

        debug!(caller_id = %caller.id, count = upcoming.len(), "Upcoming flex dates listed");
        Ok(upcoming)
    }
}

/// Reject flex types outside the known set
fn validate_flex_type(flex_type: &str) -> Result<()> {
    FlexType::parse(flex_type)
        .map(|_| ())
        .ok_or_else(|| FlexTimeError::Validation(format!("Invalid flex type: {}", flex_type)))
}

/// Reject durations outside the configured set
fn validate_duration(
    duration_minutes: i32,
    scheduling: &crate::config::settings::SchedulingConfig,
) -> Result<()> {
    if !scheduling.allowed_durations.contains(&duration_minutes) {
        let choices = scheduling
            .allowed_durations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(FlexTimeError::Validation(format!(
            "Duration must be {} minutes",
            choices
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_flex_type_validation() {
        assert!(validate_flex_type("ACCESS").is_ok());
        assert!(validate_flex_type("STUDY TIME").is_ok());
        assert_matches!(
            validate_flex_type("LUNCH"),
            Err(FlexTimeError::Validation(msg)) if msg.contains("LUNCH")
        );
    }

    #[test]
    fn test_duration_validation() {
        let scheduling = Settings::default().scheduling;
        assert!(validate_duration(45, &scheduling).is_ok());
        assert!(validate_duration(90, &scheduling).is_ok());
        assert_matches!(
            validate_duration(60, &scheduling),
            Err(FlexTimeError::Validation(msg)) if msg == "Duration must be 45 or 90 minutes"
        );
    }
}
