//! Authentication handlers for the email one-time-code login flow.
//!
//! The flow has two halves: `request-code` issues a six-digit code with
//! a ten-minute expiry and dispatches it by email, `verify-code` checks
//! the submitted code and answers with a signed session cookie. Every
//! rejection on the verify side uses one undifferentiated message so a
//! caller cannot tell a wrong code from an expired one or from an
//! account that does not exist.

use axum::extract::State;
use campus_mailer::{MailerService, VerificationEmail};
use campus_postgres::PgClient;
use campus_postgres::query::StudentRepository;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::extract::{Json, SessionClaims, SessionCookie};
use crate::handler::response::StudentSummary;
use crate::handler::{Error, ErrorKind, ErrorResponse, Result};
use crate::service::{
    CODE_TTL_MINUTES, CookiePolicy, ServiceState, SessionKeys, code_expiry,
    generate_verification_code,
};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "campus_server::handler::authentication";

/// The single user-facing message for every verification rejection.
///
/// Deliberately does not distinguish unknown accounts, wrong codes and
/// expired codes.
const INVALID_CODE_MESSAGE: &str = "Invalid or expired verification code";

/// Builds the undifferentiated verification failure.
fn invalid_credentials() -> Error<'static> {
    ErrorKind::Unauthorized
        .with_message(INVALID_CODE_MESSAGE)
        .with_resource("authentication")
}

/// Request payload for requesting a verification code.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RequestCodeRequest {
    /// Email address of the registered student.
    pub email: String,
}

/// Response returned after a verification code was dispatched.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RequestCodeResponse {
    /// Always true on success.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Issues a one-time login code for a registered email address.
///
/// Overwrites any previously pending code; only the most recently
/// issued code can verify. The stored code survives a failed email
/// dispatch and is replaced on the next request.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/auth/request-code", tag = "authentication",
    request_body = RequestCodeRequest,
    responses(
        (status = OK, description = "Verification code sent", body = RequestCodeResponse),
        (status = NOT_FOUND, description = "Email is not registered", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Email dispatch failed", body = ErrorResponse),
    ),
)]
async fn request_code(
    State(pg_client): State<PgClient>,
    State(mailer): State<MailerService>,
    Json(request): Json<RequestCodeRequest>,
) -> Result<Json<RequestCodeResponse>> {
    let normalized_email = request.email.trim().to_lowercase();

    tracing::trace!(
        target: TRACING_TARGET,
        email = %normalized_email,
        "verification code requested"
    );

    let student = pg_client
        .find_student_by_email(&normalized_email)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                target: TRACING_TARGET,
                email = %normalized_email,
                "code request failed: email not registered"
            );

            ErrorKind::NotFound
                .with_message("Email not found in our records")
                .with_resource("student")
                .into_static()
        })?;

    let code = generate_verification_code();
    let expires_at = code_expiry(Timestamp::now());
    let student = pg_client
        .set_verification_code(student.id, &code, expires_at)
        .await?;

    let email =
        VerificationEmail::new(&student.email_address, student.display_name(), code, CODE_TTL_MINUTES);
    let mail_request = email.into_request().map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET,
            student_id = %student.id,
            error = %e,
            "failed to render verification email"
        );

        ErrorKind::InternalServerError
            .with_message("Failed to send verification email")
            .into_static()
    })?;

    // Dispatch failure fails the whole request; the stored code stays
    // behind and is overwritten by the next request.
    let delivery = mailer.deliver(&mail_request).await.map_err(|e| {
        tracing::error!(
            target: TRACING_TARGET,
            student_id = %student.id,
            error = %e,
            "verification email dispatch failed"
        );

        ErrorKind::InternalServerError
            .with_message("Failed to send verification email")
            .with_resource("notification")
            .into_static()
    })?;

    if !delivery.is_success() {
        tracing::error!(
            target: TRACING_TARGET,
            student_id = %student.id,
            request_id = %delivery.request_id,
            "verification email was not accepted by the relay"
        );

        return Err(ErrorKind::InternalServerError
            .with_message("Failed to send verification email")
            .with_resource("notification")
            .into_static());
    }

    tracing::info!(
        target: TRACING_TARGET,
        student_id = %student.id,
        email = %student.email_address,
        "verification code issued and dispatched"
    );

    Ok(Json(RequestCodeResponse {
        success: true,
        message: "Verification code sent to your email".to_owned(),
    }))
}

/// Request payload for verifying a code.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct VerifyCodeRequest {
    /// Email address of the registered student.
    pub email: String,
    /// The submitted six-digit code. Matched byte-exact against the
    /// pending code, no normalization.
    pub code: String,
}

/// Response returned after a successful verification.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct VerifyCodeResponse {
    /// Always true on success.
    pub success: bool,
    /// The authenticated student.
    pub student: StudentSummary,
}

/// Verifies a one-time code and issues a session cookie.
///
/// Consuming the code and clearing it are one conditional row update,
/// so a code can never verify twice, including under concurrent
/// attempts.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/auth/verify-code", tag = "authentication",
    request_body = VerifyCodeRequest,
    responses(
        (status = OK, description = "Verification succeeded - the session cookie is in Set-Cookie", body = VerifyCodeResponse),
        (status = UNAUTHORIZED, description = "Unknown account, wrong code or expired code", body = ErrorResponse),
        (status = INTERNAL_SERVER_ERROR, description = "Internal server error", body = ErrorResponse),
    ),
)]
async fn verify_code(
    State(pg_client): State<PgClient>,
    State(session_keys): State<SessionKeys>,
    State(cookie_policy): State<CookiePolicy>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<(SessionCookie, Json<VerifyCodeResponse>)> {
    let normalized_email = request.email.trim().to_lowercase();
    let now = Timestamp::now();

    tracing::trace!(
        target: TRACING_TARGET,
        email = %normalized_email,
        "code verification attempt"
    );

    let Some(student) = pg_client.find_student_by_email(&normalized_email).await? else {
        tracing::warn!(
            target: TRACING_TARGET,
            email = %normalized_email,
            "verification failed: account not found"
        );

        return Err(invalid_credentials());
    };

    if !student.accepts_code(&request.code, now) {
        tracing::warn!(
            target: TRACING_TARGET,
            student_id = %student.id,
            has_pending_code = student.has_pending_code(),
            code_expired = student.code_expired(now),
            "verification failed: code rejected"
        );

        return Err(invalid_credentials());
    }

    // The precheck above only filters; the conditional update is the
    // authoritative decision and may still lose to a concurrent verify.
    let Some(student) = pg_client
        .consume_verification_code(student.id, &request.code, now)
        .await?
    else {
        tracing::warn!(
            target: TRACING_TARGET,
            "verification failed: code already consumed"
        );

        return Err(invalid_credentials());
    };

    let claims = SessionClaims::new(student.id, student.email_address.clone());
    let token = claims.sign(&session_keys)?;
    let cookie = SessionCookie::bearer(token, cookie_policy);

    tracing::info!(
        target: TRACING_TARGET,
        token_id = %claims.token_id,
        student_id = %student.id,
        "verification successful: session issued"
    );

    Ok((
        cookie,
        Json(VerifyCodeResponse {
            success: true,
            student: student.into(),
        }),
    ))
}

/// Response returned after logout.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct LogoutResponse {
    /// Always true.
    pub success: bool,
}

/// Clears the session cookie.
///
/// Sessions are stateless, so there is nothing to revoke server-side;
/// the response simply expires the cookie client-side.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/auth/logout", tag = "authentication",
    responses(
        (status = OK, description = "Session cookie cleared", body = LogoutResponse),
    ),
)]
async fn logout(
    State(cookie_policy): State<CookiePolicy>,
) -> Result<(SessionCookie, Json<LogoutResponse>)> {
    tracing::debug!(target: TRACING_TARGET, "logout: clearing session cookie");

    Ok((
        SessionCookie::removal(cookie_policy),
        Json(LogoutResponse { success: true }),
    ))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(request_code))
        .routes(routes!(verify_code))
        .routes(routes!(logout))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn logout_clears_session_cookie() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server.post("/auth/logout").await;
        response.assert_status(StatusCode::OK);

        let cookie = response
            .headers()
            .get("set-cookie")
            .expect("set-cookie header")
            .to_str()?
            .to_owned();

        assert!(cookie.starts_with("auth_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("HttpOnly"));

        let body: LogoutResponse = response.json();
        assert!(body.success);

        Ok(())
    }

    #[tokio::test]
    async fn request_code_rejects_malformed_body() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .post("/auth/request-code")
            .json(&serde_json::json!({ "not_email": true }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }
}
