//! Session-cookie authentication extraction and generation.
//!
//! Sessions are stateless: a successful code verification issues an
//! EdDSA-signed JWT bound to the student id and email, delivered as an
//! HTTP-only cookie. Validity is fully determined by the signature and
//! the embedded expiry; logout simply clears the cookie.

mod session_claims;
mod session_cookie;

pub use session_claims::{SESSION_TTL_SECONDS, SessionClaims};
pub use session_cookie::{AuthSession, SESSION_COOKIE_NAME, SessionCookie};
