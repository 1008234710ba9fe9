//! SMTP relay configuration.

use std::fmt;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// SMTP relay connection configuration.
///
/// All options can be provided via CLI arguments or environment
/// variables when the `config` feature is enabled.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SmtpConfig {
    /// SMTP relay hostname.
    #[cfg_attr(feature = "config", arg(long = "smtp-host", env = "SMTP_HOST"))]
    pub smtp_host: String,

    /// SMTP relay port override (optional; the transport default is used
    /// when unset).
    #[cfg_attr(feature = "config", arg(long = "smtp-port", env = "SMTP_PORT"))]
    pub smtp_port: Option<u16>,

    /// Username for relay authentication.
    #[cfg_attr(feature = "config", arg(long = "smtp-username", env = "SMTP_USER"))]
    pub smtp_username: String,

    /// Password for relay authentication.
    #[cfg_attr(feature = "config", arg(long = "smtp-password", env = "SMTP_PASSWORD"))]
    pub smtp_password: String,

    /// Sender address for outgoing mail.
    #[cfg_attr(feature = "config", arg(long = "smtp-from", env = "SMTP_FROM"))]
    pub smtp_from_address: String,

    /// Sender display name for outgoing mail.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "smtp-from-name",
            env = "SMTP_FROM_NAME",
            default_value = "Student ID Portal"
        )
    )]
    #[serde(default = "SmtpConfig::default_from_name")]
    pub smtp_from_name: String,

    /// Use STARTTLS on the submission port instead of implicit TLS.
    #[cfg_attr(
        feature = "config",
        arg(long = "smtp-starttls", env = "SMTP_STARTTLS", default_value_t = false)
    )]
    #[serde(default)]
    pub smtp_starttls: bool,
}

impl SmtpConfig {
    fn default_from_name() -> String {
        "Student ID Portal".to_owned()
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a human-readable description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.smtp_host.is_empty() {
            return Err("SMTP host cannot be empty".to_owned());
        }

        if self.smtp_from_address.is_empty() {
            return Err("SMTP sender address cannot be empty".to_owned());
        }

        if !self.smtp_from_address.contains('@') {
            return Err(format!(
                "SMTP sender address '{}' is not a valid email address",
                self.smtp_from_address
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"***")
            .field("smtp_from_address", &self.smtp_from_address)
            .field("smtp_from_name", &self.smtp_from_name)
            .field("smtp_starttls", &self.smtp_starttls)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            smtp_host: "smtp.example.com".to_owned(),
            smtp_port: None,
            smtp_username: "portal".to_owned(),
            smtp_password: "secret".to_owned(),
            smtp_from_address: "noreply@example.com".to_owned(),
            smtp_from_name: "Student ID Portal".to_owned(),
            smtp_starttls: false,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn rejects_empty_host() {
        let mut config = config();
        config.smtp_host.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_malformed_sender() {
        let mut config = config();
        config.smtp_from_address = "not-an-address".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_masks_password() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("secret"));
    }
}
