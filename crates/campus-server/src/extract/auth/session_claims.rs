//! JWT claims for session credentials.

use jiff::Timestamp;
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::SessionKeys;

/// Absolute session lifetime in seconds (24 hours).
pub const SESSION_TTL_SECONDS: i64 = 86_400;

/// JWT claims for session credentials.
///
/// Contains RFC 7519 standard claims plus the email address the session
/// was verified against. `iat`/`exp` are unix seconds, as `jsonwebtoken`
/// expects for expiry validation.
///
/// # Standard JWT Claims
///
/// | Claim | Field | Description |
/// |-------|-------|-------------|
/// | `iss` | `issued_by` | Token issuer identifier |
/// | `aud` | `audience` | Token audience identifier |
/// | `jti` | `token_id` | Unique credential identifier |
/// | `sub` | `student_id` | Student this credential represents |
/// | `iat` | `issued_at` | Credential creation time (unix seconds) |
/// | `exp` | `expires_at` | Credential expiry time (unix seconds) |
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SessionClaims {
    // Standard (or registered) claims.
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: String,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: String,

    /// JWT ID (unique identifier for this credential).
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Subject ID (the authenticated student).
    #[serde(rename = "sub")]
    pub student_id: Uuid,

    /// Issued at (unix seconds).
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiration time (unix seconds).
    #[serde(rename = "exp")]
    pub expires_at: i64,

    // Private (or custom) claims
    /// Email address the session was verified against.
    pub email: String,
}

impl SessionClaims {
    /// Default JWT audience identifier for session credentials.
    const JWT_AUDIENCE: &str = "campus:portal";
    /// Default JWT issuer identifier for session credentials.
    const JWT_ISSUER: &str = "campus";

    /// Creates claims for a freshly verified student.
    ///
    /// The credential expires [`SESSION_TTL_SECONDS`] after issuance.
    pub fn new(student_id: Uuid, email: impl Into<String>) -> Self {
        let now = Timestamp::now().as_second();

        Self {
            issued_by: Self::JWT_ISSUER.to_owned(),
            audience: Self::JWT_AUDIENCE.to_owned(),
            token_id: Uuid::new_v4(),
            student_id,
            issued_at: now,
            expires_at: now + SESSION_TTL_SECONDS,
            email: email.into(),
        }
    }

    /// Checks if the credential has expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Timestamp::now().as_second() >= self.expires_at
    }

    /// Returns the remaining lifetime in seconds, or zero if expired.
    #[inline]
    #[must_use]
    pub fn remaining_seconds(&self) -> i64 {
        (self.expires_at - Timestamp::now().as_second()).max(0)
    }

    /// Encodes the claims into a signed JWT string.
    ///
    /// # Errors
    ///
    /// Returns an internal server error when JWT encoding fails.
    pub fn sign(&self, keys: &SessionKeys) -> Result<String> {
        let header = Header::new(Algorithm::EdDSA);

        encode(&header, self, keys.encoding_key()).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                student_id = %self.student_id,
                "Failed to encode session token"
            );

            ErrorKind::InternalServerError
                .with_message("Session credential generation failed")
                .with_resource("authentication")
        })
    }

    /// Parses and validates a JWT session token.
    ///
    /// Performs signature verification (EdDSA), standard claim
    /// validation (iss, aud, exp) and an explicit expiry double-check.
    ///
    /// # Errors
    ///
    /// Returns authentication errors for invalid or expired tokens.
    pub fn from_token(token: &str, keys: &SessionKeys) -> Result<Self> {
        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.validate_exp = true;
        validation.validate_aud = true;
        validation.set_audience(&[Self::JWT_AUDIENCE]);
        validation.set_issuer(&[Self::JWT_ISSUER]);
        validation.set_required_spec_claims(&["iss", "aud", "jti", "sub", "iat", "exp"]);

        let token_data = decode::<Self>(token, keys.decoding_key(), &validation)?;
        let claims = token_data.claims;

        // Double-check expiration for security
        if claims.is_expired() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                token_id = %claims.token_id,
                student_id = %claims.student_id,
                expires_at = claims.expires_at,
                "Session token validation failed: token expired"
            );

            return Err(ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue")
                .into_static());
        }

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            token_id = %claims.token_id,
            student_id = %claims.student_id,
            remaining_seconds = claims.remaining_seconds(),
            "Session token validated"
        );

        Ok(claims)
    }
}

impl From<JwtError> for Error<'static> {
    fn from(error: JwtError) -> Self {
        match error.kind() {
            JwtErrorKind::ExpiredSignature => ErrorKind::Unauthorized
                .with_message("Your session has expired")
                .with_context("Please sign in again to continue"),
            JwtErrorKind::InvalidToken => ErrorKind::MalformedAuthToken
                .with_message("Session token is invalid")
                .with_context("The provided token format is unrecognized"),
            JwtErrorKind::InvalidSignature => ErrorKind::Unauthorized
                .with_message("Session token verification failed")
                .with_context("Token signature could not be verified"),
            JwtErrorKind::InvalidAlgorithm => ErrorKind::MalformedAuthToken
                .with_message("Session token uses unsupported format")
                .with_context("Token was signed with an incompatible algorithm"),
            JwtErrorKind::InvalidAudience => ErrorKind::Unauthorized
                .with_message("Session token is not valid for this service")
                .with_context("Token was issued for a different application"),
            JwtErrorKind::InvalidIssuer => ErrorKind::Unauthorized
                .with_message("Session token is from an untrusted source")
                .with_context("Token was not issued by this authentication system"),
            JwtErrorKind::MissingRequiredClaim(claim) => ErrorKind::MalformedAuthToken
                .with_message("Session token is incomplete")
                .with_context(format!("Token is missing required field: {}", claim)),
            JwtErrorKind::Base64(_) => ErrorKind::MalformedAuthToken
                .with_message("Session token format is corrupted")
                .with_context("Token contains invalid base64 encoding"),
            JwtErrorKind::Json(_) => ErrorKind::MalformedAuthToken
                .with_message("Session token structure is invalid")
                .with_context("Token payload contains malformed data"),
            _ => ErrorKind::InternalServerError
                .with_message("Authentication processing failed")
                .with_context("An unexpected error occurred during token validation"),
        }
        .into_static()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_keys;

    #[tokio::test]
    async fn sign_and_verify_round_trip() {
        let keys = test_keys().await;
        let student_id = Uuid::new_v4();
        let claims = SessionClaims::new(student_id, "alice@example.com");

        let token = claims.sign(&keys).unwrap();
        let decoded = SessionClaims::from_token(&token, &keys).unwrap();

        assert_eq!(decoded.student_id, student_id);
        assert_eq!(decoded.email, "alice@example.com");
        assert_eq!(decoded.token_id, claims.token_id);
        assert!(!decoded.is_expired());
    }

    #[tokio::test]
    async fn fresh_claims_live_for_a_day() {
        let claims = SessionClaims::new(Uuid::new_v4(), "alice@example.com");
        assert_eq!(claims.expires_at - claims.issued_at, SESSION_TTL_SECONDS);
        assert!(claims.remaining_seconds() > SESSION_TTL_SECONDS - 60);
    }

    #[tokio::test]
    async fn rejects_garbage_tokens() {
        let keys = test_keys().await;
        let error = SessionClaims::from_token("not-a-token", &keys).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
    }

    #[tokio::test]
    async fn rejects_tampered_tokens() {
        let keys = test_keys().await;
        let claims = SessionClaims::new(Uuid::new_v4(), "alice@example.com");
        let mut token = claims.sign(&keys).unwrap();

        // Flip a character in the signature segment.
        let flipped = if token.ends_with('A') { 'B' } else { 'A' };
        token.pop();
        token.push(flipped);

        assert!(SessionClaims::from_token(&token, &keys).is_err());
    }

    #[tokio::test]
    async fn rejects_expired_claims() {
        let keys = test_keys().await;
        let mut claims = SessionClaims::new(Uuid::new_v4(), "alice@example.com");
        claims.issued_at -= 2 * SESSION_TTL_SECONDS;
        claims.expires_at -= 2 * SESSION_TTL_SECONDS;

        let token = claims.sign(&keys).unwrap();
        let error = SessionClaims::from_token(&token, &keys).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
    }
}
