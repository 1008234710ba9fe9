//! Enhanced HTTP request extractors with improved error handling.
//!
//! Drop-in replacements for the standard Axum extractors that reject
//! malformed input through the server's own error model, plus the
//! session-cookie authentication extractor used by student-facing
//! routes.

// Authentication
pub mod auth;

// Request Data Extraction
pub mod reject;

pub use crate::extract::auth::{AuthSession, SESSION_COOKIE_NAME, SessionClaims, SessionCookie};
pub use crate::extract::reject::{Json, Path, Query, ValidateJson};
