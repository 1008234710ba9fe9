//! Email templates for portal notifications.
//!
//! Templates are rendered with handlebars at send time. Only the
//! verification-code email exists today; the subject and the expiry note
//! are part of the login flow's user-facing contract.

use handlebars::Handlebars;
use serde_json::json;

use crate::message::{MailBody, MailRequest};
use crate::{Error, Result};

/// Subject line for verification-code emails.
const VERIFICATION_SUBJECT: &str = "Your Verification Code - Student ID Portal";

/// Plain-text template for verification-code emails.
const VERIFICATION_TEXT: &str = "\
Hello {{name}},

Your verification code for accessing your Student ID Card is:

    {{code}}

This code will expire in {{expires_minutes}} minutes.

If you didn't request this code, please ignore this email.
";

/// HTML template for verification-code emails.
const VERIFICATION_HTML: &str = r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2>Hello {{name}},</h2>
      <p>Your verification code for accessing your Student ID Card is:</p>
      <div style="border: 2px dashed #059669; padding: 20px; text-align: center; margin: 20px 0; border-radius: 8px;">
        <span style="font-size: 32px; font-weight: bold; letter-spacing: 5px;">{{code}}</span>
      </div>
      <p><strong>This code will expire in {{expires_minutes}} minutes.</strong></p>
      <p>If you didn't request this code, please ignore this email.</p>
    </div>
  </body>
</html>
"#;

/// A one-time verification-code email waiting to be rendered.
#[derive(Debug, Clone)]
pub struct VerificationEmail {
    /// Destination email address.
    pub to_address: String,
    /// Recipient display name.
    pub display_name: String,
    /// The one-time code to include.
    pub code: String,
    /// Minutes until the code expires, shown to the recipient.
    pub expires_minutes: i64,
}

impl VerificationEmail {
    /// Creates a new verification email.
    pub fn new(
        to_address: impl Into<String>,
        display_name: impl Into<String>,
        code: impl Into<String>,
        expires_minutes: i64,
    ) -> Self {
        Self {
            to_address: to_address.into(),
            display_name: display_name.into(),
            code: code.into(),
            expires_minutes,
        }
    }

    /// Renders this email into a deliverable [`MailRequest`].
    ///
    /// # Errors
    ///
    /// Returns a template error if rendering fails.
    pub fn into_request(self) -> Result<MailRequest> {
        let handlebars = Handlebars::new();
        let variables = json!({
            "name": self.display_name,
            "code": self.code,
            "expires_minutes": self.expires_minutes,
        });

        let text = handlebars
            .render_template(VERIFICATION_TEXT, &variables)
            .map_err(Error::from)?;
        let html = handlebars
            .render_template(VERIFICATION_HTML, &variables)
            .map_err(Error::from)?;

        Ok(MailRequest::new(
            self.to_address,
            self.display_name,
            VERIFICATION_SUBJECT,
            MailBody::text(text).with_html(html),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_code_and_name() {
        let email = VerificationEmail::new("alice@example.com", "Alice Example", "483920", 10);
        let request = email.into_request().unwrap();

        assert_eq!(request.to_address, "alice@example.com");
        assert_eq!(request.subject, VERIFICATION_SUBJECT);
        assert!(request.body.text.contains("Alice Example"));
        assert!(request.body.text.contains("483920"));
        assert!(request.body.text.contains("10 minutes"));

        let html = request.body.html.expect("html part");
        assert!(html.contains("483920"));
        assert!(html.contains("Alice Example"));
    }

    #[test]
    fn keeps_leading_zeros_in_code() {
        let email = VerificationEmail::new("bob@example.com", "Bob", "004213", 10);
        let request = email.into_request().unwrap();
        assert!(request.body.text.contains("004213"));
    }

    #[test]
    fn escapes_html_in_display_name() {
        let email = VerificationEmail::new("eve@example.com", "<script>", "123456", 10);
        let request = email.into_request().unwrap();

        let html = request.body.html.expect("html part");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
