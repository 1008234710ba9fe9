//! Lettre-backed SMTP client implementing [`MailProvider`].

use std::sync::Arc;

use jiff::Timestamp;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{SmtpConfig, TRACING_TARGET};
use crate::{
    Error, ErrorKind, MailProvider, MailRequest, MailResponse, MailerService, Result,
    ServiceHealth,
};

/// Inner client that holds the transport and configuration.
struct SmtpMailerInner {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    config: SmtpConfig,
}

/// SMTP mail provider delivering through a configured relay.
///
/// # Examples
///
/// ```rust,ignore
/// use campus_mailer::smtp::{SmtpConfig, SmtpMailer};
///
/// let mailer = SmtpMailer::new(config)?;
/// let service = mailer.into_service();
/// ```
#[derive(Clone)]
pub struct SmtpMailer {
    inner: Arc<SmtpMailerInner>,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Creates a new SMTP mailer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the settings are invalid or
    /// the relay parameters cannot be resolved.
    pub fn new(config: SmtpConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|msg| Error::new(ErrorKind::Configuration).with_message(msg))?;

        tracing::debug!(
            target: TRACING_TARGET,
            host = %config.smtp_host,
            starttls = config.smtp_starttls,
            "Creating SMTP transport"
        );

        let mut builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        }
        .map_err(|e| {
            Error::from_source(ErrorKind::Configuration, e)
                .with_message("Failed to configure SMTP relay")
        })?;

        builder = builder.credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ));

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        let transport = builder.build();
        let inner = SmtpMailerInner { transport, config };

        tracing::info!(
            target: TRACING_TARGET,
            "SMTP transport created successfully"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &SmtpConfig {
        &self.inner.config
    }

    /// Converts this client into a [`MailerService`] for dependency injection.
    pub fn into_service(self) -> MailerService {
        MailerService::new(self)
    }

    /// Builds the sender mailbox from configuration.
    fn from_mailbox(&self) -> Result<Mailbox> {
        let address = self.inner.config.smtp_from_address.parse().map_err(|e| {
            Error::from_source(ErrorKind::Configuration, e)
                .with_message("Configured sender address is invalid")
        })?;

        Ok(Mailbox::new(
            Some(self.inner.config.smtp_from_name.clone()),
            address,
        ))
    }

    /// Assembles the lettre message for a delivery request.
    fn build_message(&self, request: &MailRequest) -> Result<Message> {
        let to_address = request.to_address.parse().map_err(|e| {
            Error::from_source(ErrorKind::InvalidInput, e)
                .with_message("Destination address is invalid")
        })?;
        let to = Mailbox::new(Some(request.to_name.clone()), to_address);

        let builder = Message::builder()
            .from(self.from_mailbox()?)
            .to(to)
            .subject(&request.subject);

        let message = match &request.body.html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                request.body.text.clone(),
                html.clone(),
            )),
            None => builder.body(request.body.text.clone()),
        };

        message.map_err(|e| {
            Error::from_source(ErrorKind::InternalError, e)
                .with_message("Failed to assemble email message")
        })
    }
}

#[async_trait::async_trait]
impl MailProvider for SmtpMailer {
    async fn deliver(&self, request: &MailRequest) -> Result<MailResponse> {
        let started_at = Timestamp::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            to = %request.to_address,
            "Delivering email via SMTP"
        );

        let message = self.build_message(request)?;

        let response = self.inner.transport.send(message).await.map_err(|e| {
            let kind = if e.is_permanent() {
                ErrorKind::Rejected
            } else if e.is_transient() {
                ErrorKind::ServiceUnavailable
            } else {
                ErrorKind::NetworkError
            };

            Error::from_source(kind, e).with_message("SMTP delivery failed")
        })?;

        let accepted = response.is_positive();
        let mail_response = MailResponse::new(request.request_id, accepted, started_at);

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            accepted,
            "SMTP delivery completed"
        );

        Ok(mail_response)
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        match self.inner.transport.test_connection().await {
            Ok(true) => Ok(ServiceHealth::healthy()),
            Ok(false) => Ok(ServiceHealth::unhealthy("SMTP relay refused connection")),
            Err(e) => Ok(ServiceHealth::unhealthy(format!(
                "SMTP relay unreachable: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MailBody;

    fn config() -> SmtpConfig {
        SmtpConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: Some(2525),
            smtp_username: "portal".to_owned(),
            smtp_password: "secret".to_owned(),
            smtp_from_address: "noreply@example.com".to_owned(),
            smtp_from_name: "Student ID Portal".to_owned(),
            smtp_starttls: true,
        }
    }

    #[tokio::test]
    async fn client_creation_succeeds() {
        let mailer = SmtpMailer::new(config()).unwrap();
        assert_eq!(mailer.config().smtp_port, Some(2525));
    }

    #[test]
    fn rejects_invalid_config() {
        let mut invalid = config();
        invalid.smtp_from_address = "nonsense".to_owned();
        assert!(SmtpMailer::new(invalid).is_err());
    }

    #[tokio::test]
    async fn builds_multipart_message() {
        let mailer = SmtpMailer::new(config()).unwrap();
        let request = MailRequest::new(
            "alice@example.com",
            "Alice",
            "Subject",
            MailBody::text("plain").with_html("<p>rich</p>"),
        );

        assert!(mailer.build_message(&request).is_ok());
    }

    #[tokio::test]
    async fn rejects_invalid_destination() {
        let mailer = SmtpMailer::new(config()).unwrap();
        let request = MailRequest::new(
            "not an address",
            "Nobody",
            "Subject",
            MailBody::text("plain"),
        );

        let error = mailer.build_message(&request).unwrap_err();
        assert_eq!(error.kind, ErrorKind::InvalidInput);
    }
}
