//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the FlexTime application.

use crate::config::LoggingConfig;
use crate::utils::errors::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize logging based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "flextime.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(())
}

/// Log registration workflow events with structured data
pub fn log_registration_event(student_id: Uuid, action: &str, details: Option<&str>) {
    info!(
        student_id = %student_id,
        action = action,
        details = details,
        "Registration event"
    );
}

/// Log admin actions
pub fn log_admin_action(admin_id: Uuid, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        admin_id = %admin_id,
        action = action,
        target = target,
        details = details,
        "Admin action performed"
    );
}

/// Log email delivery results
pub fn log_email_result(recipient: &str, success: bool, reason: Option<&str>) {
    if success {
        info!(recipient = recipient, "Removal email sent");
    } else {
        warn!(recipient = recipient, reason = reason, "Removal email failed");
    }
}
