//! Provider-agnostic mailer service for dependency injection.

use std::fmt;
use std::sync::{Arc, Mutex};

use jiff::Timestamp;

use crate::{
    Error, ErrorKind, MailProvider, MailRequest, MailResponse, Result, ServiceHealth,
    TRACING_TARGET,
};

/// Cloneable handle around a [`MailProvider`] implementation.
///
/// Constructed once at startup from whichever provider the deployment
/// uses and injected into request handlers through application state, so
/// tests can substitute an in-memory provider without process-wide
/// side effects.
#[derive(Clone)]
pub struct MailerService {
    provider: Arc<dyn MailProvider>,
}

impl MailerService {
    /// Creates a new service wrapping the given provider.
    pub fn new(provider: impl MailProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Delivers an email through the underlying provider.
    ///
    /// # Errors
    ///
    /// Propagates the provider's delivery error unchanged.
    pub async fn deliver(&self, request: &MailRequest) -> Result<MailResponse> {
        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            to = %request.to_address,
            subject = %request.subject,
            "Delivering email"
        );

        let response = self.provider.deliver(request).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            accepted = response.accepted,
            "Email delivery completed"
        );

        Ok(response)
    }

    /// Performs a health check on the underlying provider.
    pub async fn health_check(&self) -> Result<ServiceHealth> {
        self.provider.health_check().await
    }
}

impl fmt::Debug for MailerService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailerService").finish_non_exhaustive()
    }
}

/// In-memory mail provider that records deliveries instead of sending.
///
/// Used in tests and local development to observe what would have been
/// sent, and to simulate relay failures.
#[derive(Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<MailRequest>>>,
    failing: bool,
}

impl MemoryMailer {
    /// Creates a provider that accepts every delivery.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that fails every delivery.
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: true,
        }
    }

    /// Returns a copy of every request delivered so far.
    pub fn sent(&self) -> Vec<MailRequest> {
        self.sent.lock().expect("mailer lock poisoned").clone()
    }

    /// Returns the number of requests delivered so far.
    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("mailer lock poisoned").len()
    }

    /// Converts this provider into a [`MailerService`].
    pub fn into_service(self) -> MailerService {
        MailerService::new(self)
    }
}

impl fmt::Debug for MemoryMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryMailer")
            .field("failing", &self.failing)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl MailProvider for MemoryMailer {
    async fn deliver(&self, request: &MailRequest) -> Result<MailResponse> {
        let started_at = Timestamp::now();

        if self.failing {
            return Err(Error::new(ErrorKind::ServiceUnavailable)
                .with_message("Memory mailer configured to fail"));
        }

        self.sent
            .lock()
            .expect("mailer lock poisoned")
            .push(request.clone());

        Ok(MailResponse::new(request.request_id, true, started_at))
    }

    async fn health_check(&self) -> Result<ServiceHealth> {
        Ok(ServiceHealth::healthy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MailBody;

    fn request() -> MailRequest {
        MailRequest::new(
            "alice@example.com",
            "Alice",
            "Subject",
            MailBody::text("body"),
        )
    }

    #[tokio::test]
    async fn memory_mailer_records_deliveries() {
        let mailer = MemoryMailer::new();
        let service = mailer.clone().into_service();

        let response = service.deliver(&request()).await.unwrap();
        assert!(response.is_success());
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(mailer.sent()[0].to_address, "alice@example.com");
    }

    #[tokio::test]
    async fn failing_mailer_rejects_deliveries() {
        let mailer = MemoryMailer::failing();
        let service = mailer.clone().into_service();

        let error = service.deliver(&request()).await.unwrap_err();
        assert_eq!(error.kind, ErrorKind::ServiceUnavailable);
        assert_eq!(mailer.sent_count(), 0);
    }

    #[tokio::test]
    async fn memory_mailer_is_healthy() {
        let service = MemoryMailer::new().into_service();
        let health = service.health_check().await.unwrap();
        assert!(health.is_operational());
    }
}
