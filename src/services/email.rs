//! Email delivery service implementation
//!
//! This service posts removal notices to the hosted email delivery API.
//! Delivery is best-effort from the workflow's point of view: callers use
//! [`EmailClient::try_send_removal_notice`] and carry the outcome in their
//! result instead of failing the surrounding operation.

use crate::config::settings::Settings;
use crate::utils::errors::{EmailError, EmailResult, FlexTimeError, Result};
use crate::utils::logging::log_email_result;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Everything the removal notice template needs
#[derive(Debug, Clone)]
pub struct RemovalNotice {
    pub student_email: String,
    pub student_name: String,
    pub session_title: String,
    pub teacher_name: String,
    pub room_number: String,
    pub flex_date: NaiveDate,
    pub selection_deadline: DateTime<Utc>,
}

/// Email API send request structure
#[derive(Debug, Clone, Serialize)]
struct SendEmailRequest {
    from: String,
    to: String,
    subject: String,
    html: String,
}

/// Email API send response structure
#[derive(Debug, Clone, Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

/// Result of a best-effort delivery attempt, reported to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailOutcome {
    Sent,
    Failed { reason: String },
    Disabled,
}

impl EmailOutcome {
    pub fn was_sent(&self) -> bool {
        matches!(self, EmailOutcome::Sent)
    }
}

/// Client for the hosted email delivery API
#[derive(Debug, Clone)]
pub struct EmailClient {
    client: Client,
    settings: Settings,
}

impl EmailClient {
    /// Create a new EmailClient instance
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.email.timeout_seconds))
            .user_agent("FlexTime/1.0")
            .build()
            .map_err(FlexTimeError::Http)?;

        Ok(Self { client, settings })
    }

    /// Check if outgoing email is enabled
    pub fn is_enabled(&self) -> bool {
        self.settings.features.email_notifications
    }

    /// Send a removal notice, swallowing failures into the returned outcome
    pub async fn try_send_removal_notice(&self, notice: &RemovalNotice) -> EmailOutcome {
        if !self.is_enabled() {
            debug!(recipient = %notice.student_email, "Email notifications disabled, skipping send");
            return EmailOutcome::Disabled;
        }

        match self.send_removal_notice(notice).await {
            Ok(()) => {
                log_email_result(&notice.student_email, true, None);
                EmailOutcome::Sent
            }
            Err(e) => {
                log_email_result(&notice.student_email, false, Some(&e.to_string()));
                EmailOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Send a removal notice through the email API
    pub async fn send_removal_notice(&self, notice: &RemovalNotice) -> EmailResult<()> {
        let url = format!(
            "{}/emails",
            self.settings.email.api_url.trim_end_matches('/')
        );

        let request = SendEmailRequest {
            from: self.settings.email.from_address.clone(),
            to: notice.student_email.clone(),
            subject: removal_subject(notice.flex_date),
            html: render_removal_html(notice),
        };

        debug!(recipient = %notice.student_email, url = %url, "Sending removal notice");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.email.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmailError::Timeout
                } else if e.is_connect() {
                    EmailError::ServiceUnavailable
                } else {
                    EmailError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(EmailError::RequestFailed(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| EmailError::InvalidResponse(e.to_string()))?;

        debug!(recipient = %notice.student_email, message_id = ?body.id, "Removal notice accepted");
        Ok(())
    }
}

/// Subject line for a removal notice
fn removal_subject(flex_date: NaiveDate) -> String {
    format!("Flex Time Session Update - {}", flex_date.format("%B %-d, %Y"))
}

/// Render the removal notice body
fn render_removal_html(notice: &RemovalNotice) -> String {
    format!(
        r#"<html>
<body>
  <h1>Flex Time Session Update</h1>
  <p>Hi {student},</p>
  <p>You have been <strong>removed</strong> from the following flex time session:</p>
  <ul>
    <li><strong>Session:</strong> {title}</li>
    <li><strong>Teacher:</strong> {teacher}</li>
    <li><strong>Room:</strong> {room}</li>
    <li><strong>Date:</strong> {date}</li>
  </ul>
  <p>Please log into the Flex Time system and select a new session for this date
  as soon as possible.</p>
  <p><strong>Selection deadline:</strong> {deadline}</p>
  <p>If you don't select a session by the deadline, you will be automatically
  assigned to your homeroom.</p>
  <p>If you have questions about this change, please contact {teacher}.</p>
</body>
</html>"#,
        student = notice.student_name,
        title = notice.session_title,
        teacher = notice.teacher_name,
        room = notice.room_number,
        date = notice.flex_date.format("%A, %B %-d, %Y"),
        deadline = notice.selection_deadline.format("%B %-d at %H:%M UTC"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

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

    #[test]
    fn test_removal_subject_includes_date() {
        let subject = removal_subject(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(subject, "Flex Time Session Update - January 10, 2025");
    }

    #[test]
    fn test_removal_html_contains_details() {
        let html = render_removal_html(&sample_notice());
        assert!(html.contains("Sam Rivera"));
        assert!(html.contains("Robotics Lab"));
        assert!(html.contains("Ms. Okafor"));
        assert!(html.contains("214"));
        assert!(html.contains("Friday, January 10, 2025"));
    }

    #[test]
    fn test_request_serialization() {
        let request = SendEmailRequest {
            from: "Flex Time System <noreply@flextime.local>".to_string(),
            to: "sam@example.edu".to_string(),
            subject: "Test".to_string(),
            html: "<p>hi</p>".to_string(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["to"], "sam@example.edu");
        assert_eq!(value["subject"], "Test");
    }

    #[test]
    fn test_outcome_was_sent() {
        assert!(EmailOutcome::Sent.was_sent());
        assert!(!EmailOutcome::Disabled.was_sent());
        assert!(!EmailOutcome::Failed {
            reason: "HTTP 500".to_string()
        }
        .was_sent());
    }
}
