//! Integration tests for the caller-facing error surface
//!
//! Every workflow error maps onto one of the six status classes; these tests
//! pin the mapping and the configuration contract from the public API.

use anyhow::Result;
use flextime::config::Settings;
use flextime::utils::errors::{EmailError, FlexTimeError, StatusClass};
use uuid::Uuid;

#[test]
fn workflow_errors_map_to_status_classes() -> Result<()> {
    let cases = vec![
        (
            FlexTimeError::Unauthenticated("missing token".into()),
            StatusClass::Unauthorized,
        ),
        (
            FlexTimeError::Forbidden("teachers only".into()),
            StatusClass::Forbidden,
        ),
        (
            FlexTimeError::RegistrationNotFound {
                registration_id: Uuid::new_v4(),
            },
            StatusClass::NotFound,
        ),
        (
            FlexTimeError::Validation("The selection deadline for this date has passed".into()),
            StatusClass::Validation,
        ),
        (
            FlexTimeError::Conflict("Session full".into()),
            StatusClass::Conflict,
        ),
        (
            FlexTimeError::Email(EmailError::ServiceUnavailable),
            StatusClass::Internal,
        ),
    ];

    for (error, expected) in cases {
        assert_eq!(error.status_class(), expected, "for {:?}", error);
    }

    Ok(())
}

#[test]
fn recoverable_errors_carry_correctable_detail() {
    let err = FlexTimeError::Conflict("Already locked by Ms. Okafor".to_string());
    assert!(err.is_recoverable());
    assert!(err.to_string().contains("Ms. Okafor"));
}

#[test]
fn default_settings_need_only_a_secret() -> Result<()> {
    let mut settings = Settings::default();
    assert!(settings.validate().is_err());

    settings.auth.jwt_secret = "secret".to_string();
    settings.validate()?;

    assert_eq!(settings.scheduling.selection_window_days, 7);
    assert_eq!(settings.scheduling.allowed_durations, vec![45, 90]);
    Ok(())
}

#[test]
fn library_reports_its_identity() {
    let info = flextime::info();
    assert!(info.starts_with("flextime v"));
}
