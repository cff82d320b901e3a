//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod audit;
pub mod flex_date;
pub mod notification;
pub mod registration;
pub mod session;
pub mod user;

// Re-export repositories
pub use audit::AuditRepository;
pub use flex_date::FlexDateRepository;
pub use notification::NotificationRepository;
pub use registration::RegistrationRepository;
pub use session::{NewSession, SessionRepository};
pub use user::UserRepository;
