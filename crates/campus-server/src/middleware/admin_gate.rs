//! Admin password gate middleware.
//!
//! Dashboard endpoints present the configured admin password in a
//! request header; everything else on the admin router is rejected
//! before reaching a handler.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::TRACING_TARGET_AUTHORIZATION;
use crate::handler::ErrorKind;
use crate::service::AdminGate;

/// Header carrying the admin dashboard password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Rejects requests that do not present the configured admin password.
pub async fn require_admin(
    State(gate): State<AdminGate>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented {
        Some(password) if gate.verify(password) => next.run(request).await,
        Some(_) => {
            tracing::warn!(
                target: TRACING_TARGET_AUTHORIZATION,
                path = %request.uri().path(),
                "admin request rejected: wrong password"
            );

            ErrorKind::Forbidden
                .with_message("Invalid admin password")
                .into_response()
        }
        None => {
            tracing::debug!(
                target: TRACING_TARGET_AUTHORIZATION,
                path = %request.uri().path(),
                "admin request rejected: password header missing"
            );

            ErrorKind::MissingAuthToken
                .with_message("Admin authentication required")
                .with_context("Missing admin password header")
                .into_response()
        }
    }
}
