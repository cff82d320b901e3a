//! Services module
//!
//! This module contains business logic services

pub mod email;
pub mod flex_date;
pub mod identity;
pub mod notification;
pub mod registration;
pub mod session;
pub mod user;

// Re-export commonly used services
pub use email::{EmailClient, EmailOutcome, RemovalNotice};
pub use flex_date::FlexDateService;
pub use identity::{require_admin, require_staff, Caller, IdentityService};
pub use notification::{NotificationFeed, NotificationService};
pub use registration::{RegistrationService, RemovalReceipt};
pub use session::SessionService;
pub use user::{DirectoryStats, UserService};

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub identity_service: IdentityService,
    pub user_service: UserService,
    pub flex_date_service: FlexDateService,
    pub session_service: SessionService,
    pub registration_service: RegistrationService,
    pub notification_service: NotificationService,
    pub email_client: EmailClient,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(db: DatabaseService, settings: Settings) -> Result<Self> {
        let email_client = EmailClient::new(settings.clone())?;
        let notification_service = NotificationService::new(db.notifications.clone());

        let identity_service = IdentityService::new(db.users.clone(), settings.clone());
        let user_service = UserService::new(
            db.users.clone(),
            db.flex_dates.clone(),
            db.sessions.clone(),
            db.registrations.clone(),
            db.audit.clone(),
        );
        let flex_date_service = FlexDateService::new(
            db.flex_dates.clone(),
            db.sessions.clone(),
            db.registrations.clone(),
            db.audit.clone(),
            settings.clone(),
        );
        let session_service = SessionService::new(
            db.sessions.clone(),
            db.flex_dates.clone(),
            db.registrations.clone(),
            db.users.clone(),
            settings.clone(),
        );
        let registration_service = RegistrationService::new(
            db.registrations.clone(),
            db.sessions.clone(),
            db.flex_dates.clone(),
            db.users.clone(),
            notification_service.clone(),
            email_client.clone(),
            db.audit.clone(),
            settings,
        );

        Ok(Self {
            identity_service,
            user_service,
            flex_date_service,
            session_service,
            registration_service,
            notification_service,
            email_client,
        })
    }

    /// Health check for all services
    pub fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            email_enabled: self.email_client.is_enabled(),
            registration_service_ready: true,
            identity_service_ready: true,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub email_enabled: bool,
    pub registration_service_ready: bool,
    pub identity_service_ready: bool,
}

impl ServiceHealthStatus {
    /// Check if all critical services are healthy
    pub fn is_healthy(&self) -> bool {
        self.registration_service_ready && self.identity_service_ready
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.registration_service_ready {
            issues.push("Registration service not ready".to_string());
        }
        if !self.identity_service_ready {
            issues.push("Identity service not ready".to_string());
        }
        if !self.email_enabled {
            issues.push("Email notifications disabled".to_string());
        }

        issues
    }
}
