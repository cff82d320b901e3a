//! Integration tests for the email delivery client
//!
//! These run the client against a mock HTTP server to pin down the request
//! shape and the best-effort delivery contract.

use chrono::{NaiveDate, TimeZone, Utc};
use flextime::config::Settings;
use flextime::services::{EmailClient, EmailOutcome, RemovalNotice};
use flextime::utils::errors::EmailError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server_url: &str, enabled: bool) -> Settings {
    let mut settings = Settings::default();
    settings.email.api_url = server_url.to_string();
    settings.email.api_key = "test-key".to_string();
    settings.features.email_notifications = enabled;
    settings
}

fn sample_notice() -> RemovalNotice {
    RemovalNotice {
        student_email: "sam@example.edu".to_string(),
        student_name: "Sam Rivera".to_string(),
        session_title: "Robotics Lab".to_string(),
        teacher_name: "Ms. Okafor".to_string(),
        room_number: "214".to_string(),
        flex_date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
        selection_deadline: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn sends_removal_notice_with_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "email_123"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = EmailClient::new(settings_for(&server.uri(), true)).unwrap();
    let outcome = client.try_send_removal_notice(&sample_notice()).await;

    assert_eq!(outcome, EmailOutcome::Sent);
}

#[tokio::test]
async fn delivery_failure_is_swallowed_into_outcome() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let client = EmailClient::new(settings_for(&server.uri(), true)).unwrap();
    let outcome = client.try_send_removal_notice(&sample_notice()).await;

    match outcome {
        EmailOutcome::Failed { reason } => {
            assert!(reason.contains("500"), "unexpected reason: {}", reason);
        }
        other => panic!("expected Failed, got {:?}", other),
    }
}

#[tokio::test]
async fn send_reports_http_error_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(422).set_body_string("bad recipient"))
        .mount(&server)
        .await;

    let client = EmailClient::new(settings_for(&server.uri(), true)).unwrap();
    let result = client.send_removal_notice(&sample_notice()).await;

    match result {
        Err(EmailError::RequestFailed(msg)) => {
            assert!(msg.contains("422"));
            assert!(msg.contains("bad recipient"));
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn disabled_notifications_never_hit_the_api() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/emails"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = EmailClient::new(settings_for(&server.uri(), false)).unwrap();
    let outcome = client.try_send_removal_notice(&sample_notice()).await;

    assert_eq!(outcome, EmailOutcome::Disabled);
}
