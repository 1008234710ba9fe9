//! Lettre-based SMTP delivery provider.

mod client;
mod config;

pub use client::SmtpMailer;
pub use config::SmtpConfig;

/// Tracing target for SMTP operations.
pub const TRACING_TARGET: &str = "campus_mailer::smtp";
