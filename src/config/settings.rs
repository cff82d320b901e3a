//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub email: EmailConfig,
    pub auth: AuthConfig,
    pub scheduling: SchedulingConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Email delivery API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    pub api_url: String,
    pub api_key: String,
    pub from_address: String,
    pub timeout_seconds: u64,
}

/// Identity provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Business rules for the registration workflow
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulingConfig {
    /// Students can only register this many days ahead
    pub selection_window_days: i64,
    pub min_grade: i32,
    pub max_grade: i32,
    /// Valid flex period lengths in minutes
    pub allowed_durations: Vec<i32>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
    pub max_files: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub email_notifications: bool,
    pub session_templates: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("FLEXTIME"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::FlexTimeError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/flextime".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            email: EmailConfig {
                api_url: "https://api.resend.com".to_string(),
                api_key: String::new(),
                from_address: "Flex Time System <noreply@flextime.local>".to_string(),
                timeout_seconds: 5,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
            },
            scheduling: SchedulingConfig {
                selection_window_days: 7,
                min_grade: 9,
                max_grade: 12,
                allowed_durations: vec![45, 90],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/flextime".to_string(),
                max_files: 5,
            },
            features: FeaturesConfig {
                email_notifications: true,
                session_templates: true,
            },
        }
    }
}
