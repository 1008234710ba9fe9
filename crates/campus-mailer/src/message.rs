//! Mail delivery request and response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rendered body of an outgoing email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailBody {
    /// Plain-text part, always present.
    pub text: String,
    /// Optional HTML alternative part.
    pub html: Option<String>,
}

impl MailBody {
    /// Creates a plain-text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: None,
        }
    }

    /// Attaches an HTML alternative part.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }
}

/// A mail delivery request.
#[derive(Debug, Clone)]
pub struct MailRequest {
    /// Unique identifier for this request.
    pub request_id: Uuid,
    /// Destination email address.
    pub to_address: String,
    /// Display name of the recipient.
    pub to_name: String,
    /// Message subject line.
    pub subject: String,
    /// Rendered message body.
    pub body: MailBody,
}

impl MailRequest {
    /// Creates a new mail request.
    pub fn new(
        to_address: impl Into<String>,
        to_name: impl Into<String>,
        subject: impl Into<String>,
        body: MailBody,
    ) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            to_address: to_address.into(),
            to_name: to_name.into(),
            subject: subject.into(),
            body,
        }
    }
}

/// Response from a mail delivery attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailResponse {
    /// Request ID this response corresponds to.
    pub request_id: Uuid,
    /// Whether the relay accepted the message.
    pub accepted: bool,
    /// Timestamp when the delivery attempt started.
    pub started_at: Timestamp,
    /// Timestamp when the delivery attempt finished.
    pub finished_at: Timestamp,
}

impl MailResponse {
    /// Creates a new mail response.
    pub fn new(request_id: Uuid, accepted: bool, started_at: Timestamp) -> Self {
        Self {
            request_id,
            accepted,
            started_at,
            finished_at: Timestamp::now(),
        }
    }

    /// Returns whether the delivery was accepted by the relay.
    pub fn is_success(&self) -> bool {
        self.accepted
    }

    /// Calculates the delivery time as a span.
    pub fn duration(&self) -> jiff::Span {
        self.started_at.until(self.finished_at).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique() {
        let body = MailBody::text("hello");
        let first = MailRequest::new("a@example.com", "A", "Subject", body.clone());
        let second = MailRequest::new("a@example.com", "A", "Subject", body);
        assert_ne!(first.request_id, second.request_id);
    }

    #[test]
    fn body_with_html_keeps_text() {
        let body = MailBody::text("plain").with_html("<p>rich</p>");
        assert_eq!(body.text, "plain");
        assert_eq!(body.html.as_deref(), Some("<p>rich</p>"));
    }

    #[test]
    fn response_reports_success() {
        let started = Timestamp::now();
        let response = MailResponse::new(Uuid::now_v7(), true, started);
        assert!(response.is_success());

        let response = MailResponse::new(Uuid::now_v7(), false, started);
        assert!(!response.is_success());
    }
}
