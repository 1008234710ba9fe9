#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod health;
mod service;

pub mod message;
pub mod template;

#[cfg(feature = "smtp")]
#[cfg_attr(docsrs, doc(cfg(feature = "smtp")))]
pub mod smtp;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use health::{ServiceHealth, ServiceStatus};
pub use message::{MailBody, MailRequest, MailResponse};
pub use service::{MailerService, MemoryMailer};
pub use template::VerificationEmail;

/// Tracing target for mail delivery operations.
pub const TRACING_TARGET: &str = "campus_mailer::delivery";

/// Core trait for email delivery operations.
///
/// Implement this trait to create custom mail delivery providers. The
/// portal treats any `Err` from [`deliver`] as a hard failure of the
/// operation that requested the email.
///
/// [`deliver`]: MailProvider::deliver
#[async_trait::async_trait]
pub trait MailProvider: Send + Sync {
    /// Delivers an email to the destination address in the request.
    async fn deliver(&self, request: &MailRequest) -> Result<MailResponse>;

    /// Performs a health check on the mail provider.
    async fn health_check(&self) -> Result<ServiceHealth>;
}
