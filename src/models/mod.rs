//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod audit;
pub mod flex_date;
pub mod notification;
pub mod registration;
pub mod session;
pub mod user;

// Re-export commonly used models
pub use audit::AuditEntry;
pub use flex_date::{
    CreateFlexDateRequest, FlexDate, FlexDateOverview, FlexType, UpcomingFlexDate,
    UpdateFlexDateRequest,
};
pub use notification::{CreateNotificationRequest, Notification, NotificationType};
pub use registration::{Registration, RegistrationStatus, RosterEntry, StudentRegistration};
pub use session::{AvailableSessions, CreateSessionRequest, Session, SessionAvailability, SessionTemplate};
pub use user::{CreateUserRequest, Role, UpdateUserRequest, User, UserFilter};
