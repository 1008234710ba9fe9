//! Validated JSON extractor with automatic validation.
//!
//! [`ValidateJson`] combines JSON deserialization with automatic
//! validation using the `validator` crate, rejecting invalid payloads
//! with the first field error as the user-facing message.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// JSON extractor with automatic validation.
///
/// Works with any type that implements both `serde::Deserialize` and
/// `validator::Validate`. Also see [`Json`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // First, deserialize the JSON
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        // Then validate the deserialized data
        data.validate()?;
        Ok(Self::new(data))
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let message = first_error_message(&errors)
            .unwrap_or_else(|| "Request data failed validation".to_owned());

        ErrorKind::BadRequest.with_message(message).into_static()
    }
}

/// Extracts the first human-readable message from a validation error set.
fn first_error_message(errors: &ValidationErrors) -> Option<String> {
    let field_errors = errors.field_errors();
    let (field, errors) = field_errors.iter().next()?;
    let error = errors.first()?;

    Some(match &error.message {
        Some(message) => message.to_string(),
        None => format!("Field '{}' failed validation rule '{}'", field, error.code),
    })
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, Validate)]
    struct RegisterProbe {
        #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
        first_name: String,
        #[validate(email(message = "Invalid email address"))]
        email_address: String,
    }

    #[test]
    fn valid_payload_passes() {
        let probe = RegisterProbe {
            first_name: "Alice".to_owned(),
            email_address: "alice@example.com".to_owned(),
        };
        assert!(probe.validate().is_ok());
    }

    #[test]
    fn validation_error_surfaces_first_message() {
        let probe = RegisterProbe {
            first_name: "A".to_owned(),
            email_address: "alice@example.com".to_owned(),
        };

        let errors = probe.validate().unwrap_err();
        let error: Error<'static> = errors.into();
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(
            error.message(),
            Some("First name must be at least 2 characters")
        );
    }

    #[test]
    fn unnamed_rules_fall_back_to_code() {
        #[derive(Debug, Deserialize, Validate)]
        struct Probe {
            #[validate(length(min = 10))]
            phone_number: String,
        }

        let probe = Probe {
            phone_number: "123".to_owned(),
        };

        let errors = probe.validate().unwrap_err();
        let error: Error<'static> = errors.into();
        let message = error.message().unwrap();
        assert!(message.contains("phone_number"));
        assert!(message.contains("length"));
    }
}
