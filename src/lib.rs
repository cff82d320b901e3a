//! FlexTime scheduling backend
//!
//! Students pick sessions for designated flex dates, teachers create and
//! manage sessions and rosters, admins maintain users and the flex date
//! calendar. This library exposes those workflows as services over a
//! Postgres-backed store; the registration workflow enforces the capacity,
//! deadline, grade, and locking rules.

pub mod config;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{FlexTimeError, Result, StatusClass};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use models::Role;
pub use services::{Caller, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
