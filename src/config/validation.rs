//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{FlexTimeError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_email_config(&settings.email)?;
    validate_auth_config(&settings.auth)?;
    validate_scheduling_config(&settings.scheduling)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(FlexTimeError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(FlexTimeError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(FlexTimeError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate email delivery configuration
fn validate_email_config(config: &super::EmailConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(FlexTimeError::Config("Email API URL is required".to_string()));
    }

    url::Url::parse(&config.api_url)
        .map_err(|e| FlexTimeError::Config(format!("Invalid email API URL: {}", e)))?;

    if config.from_address.is_empty() {
        return Err(FlexTimeError::Config(
            "Email from address is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(FlexTimeError::Config(
            "Email timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate identity provider configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.is_empty() {
        return Err(FlexTimeError::Config("JWT secret is required".to_string()));
    }

    Ok(())
}

/// Validate scheduling rules configuration
fn validate_scheduling_config(config: &super::SchedulingConfig) -> Result<()> {
    if config.selection_window_days <= 0 {
        return Err(FlexTimeError::Config(
            "Selection window must be at least one day".to_string(),
        ));
    }

    if config.min_grade > config.max_grade {
        return Err(FlexTimeError::Config(
            "Min grade cannot be greater than max grade".to_string(),
        ));
    }

    if config.allowed_durations.is_empty() {
        return Err(FlexTimeError::Config(
            "At least one allowed duration is required".to_string(),
        ));
    }

    if config.allowed_durations.iter().any(|&d| d <= 0) {
        return Err(FlexTimeError::Config(
            "Durations must be positive".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(FlexTimeError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(FlexTimeError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "test-secret".to_string();
        settings
    }

    #[test]
    fn test_default_settings_validate_with_secret() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_jwt_secret_rejected() {
        let settings = Settings::default();
        assert_matches!(
            validate_settings(&settings),
            Err(FlexTimeError::Config(msg)) if msg.contains("JWT secret")
        );
    }

    #[test]
    fn test_bad_email_url_rejected() {
        let mut settings = valid_settings();
        settings.email.api_url = "not a url".to_string();
        assert_matches!(
            validate_settings(&settings),
            Err(FlexTimeError::Config(msg)) if msg.contains("email API URL")
        );
    }

    #[test]
    fn test_connection_bounds_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_grade_bounds_rejected() {
        let mut settings = valid_settings();
        settings.scheduling.min_grade = 12;
        settings.scheduling.max_grade = 9;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
