//! Session cookie generation and extraction.

use std::borrow::Cow;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{HeaderValue, SET_COOKIE};
use axum::http::request::Parts;
use axum::response::{IntoResponseParts, ResponseParts};
use axum_extra::extract::CookieJar;

use super::{SESSION_TTL_SECONDS, SessionClaims};
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{CookiePolicy, SessionKeys};

/// Fixed name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Session cookie response part.
///
/// Serializes the signed credential into a `Set-Cookie` header with the
/// attributes the login flow promises: HTTP-only, `SameSite=Lax`,
/// `Max-Age` of 24 hours, and `Secure` when the deployment requires it.
#[must_use]
#[derive(Debug, Clone)]
pub struct SessionCookie {
    value: Cow<'static, str>,
    max_age: i64,
    secure: bool,
}

impl SessionCookie {
    /// Creates a cookie carrying a freshly signed credential.
    pub fn bearer(token: String, policy: CookiePolicy) -> Self {
        Self {
            value: Cow::Owned(token),
            max_age: SESSION_TTL_SECONDS,
            secure: policy.secure(),
        }
    }

    /// Creates a cookie that immediately expires the session client-side.
    pub fn removal(policy: CookiePolicy) -> Self {
        Self {
            value: Cow::Borrowed(""),
            max_age: 0,
            secure: policy.secure(),
        }
    }

    /// Renders the full `Set-Cookie` header value.
    pub fn header_value(&self) -> String {
        let mut header = format!(
            "{}={}; Max-Age={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE_NAME, self.value, self.max_age
        );

        if self.secure {
            header.push_str("; Secure");
        }

        header
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = Error<'static>;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let value = HeaderValue::from_str(&self.header_value()).map_err(|_| {
            ErrorKind::InternalServerError
                .with_context("session cookie produced an invalid header value")
        })?;

        res.headers_mut().append(SET_COOKIE, value);
        Ok(res)
    }
}

/// Authenticated session extractor.
///
/// Reads the session cookie, validates the signed credential and exposes
/// its claims. Cached in request extensions so multiple extractions in
/// one request validate only once.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionClaims);

impl AuthSession {
    /// Returns the validated claims.
    #[inline]
    pub fn claims(&self) -> &SessionClaims {
        &self.0
    }

    /// Consumes the extractor and returns the claims.
    #[inline]
    pub fn into_claims(self) -> SessionClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Return the cached session if another extractor already ran
        if let Some(session) = parts.extensions.get::<Self>() {
            return Ok(session.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                "request rejected: session cookie missing"
            );

            return Err(ErrorKind::MissingAuthToken
                .with_message("Authentication required")
                .with_context("Missing session cookie")
                .into_static());
        };

        let keys = SessionKeys::from_ref(state);
        let claims = SessionClaims::from_token(cookie.value(), &keys)?;

        let session = Self(claims);
        parts.extensions.insert(session.clone());
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_cookie_carries_session_attributes() {
        let cookie = SessionCookie::bearer("token-value".to_owned(), CookiePolicy::lax());
        let header = cookie.header_value();

        assert!(header.starts_with("auth_token=token-value"));
        assert!(header.contains("Max-Age=86400"));
        assert!(header.contains("Path=/"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("SameSite=Lax"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn secure_policy_adds_secure_attribute() {
        let cookie = SessionCookie::bearer("token-value".to_owned(), CookiePolicy::secure_lax());
        assert!(cookie.header_value().ends_with("; Secure"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = SessionCookie::removal(CookiePolicy::lax());
        let header = cookie.header_value();

        assert!(header.starts_with("auth_token=;"));
        assert!(header.contains("Max-Age=0"));
    }
}
