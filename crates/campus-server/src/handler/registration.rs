//! Student self-registration handler.

use axum::extract::State;
use axum::http::StatusCode;
use campus_postgres::PgClient;
use campus_postgres::model::NewStudent;
use campus_postgres::query::StudentRepository;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;
use validator::Validate;

use crate::extract::{Json, ValidateJson};
use crate::handler::{ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Tracing target for registration operations.
const TRACING_TARGET: &str = "campus_server::handler::registration";

/// Request payload for self-registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    /// Given name.
    #[validate(length(min = 2, message = "First name must be at least 2 characters"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 2, message = "Last name must be at least 2 characters"))]
    pub last_name: String,
    /// Email address used for verification and login.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Contact phone number.
    #[validate(length(min = 10, message = "Invalid phone number"))]
    pub phone_number: String,
}

/// Response returned after successful registration.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    /// Always true on success.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
    /// ID of the created student.
    pub student_id: Uuid,
}

/// Registers a new student account.
///
/// The account starts unverified; the student proves control of the
/// email address later through the one-time-code login flow.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/students/register", tag = "students",
    request_body = RegisterRequest,
    responses(
        (status = CREATED, description = "Student registered", body = RegisterResponse),
        (status = BAD_REQUEST, description = "Invalid registration data", body = ErrorResponse),
        (status = CONFLICT, description = "Email already registered", body = ErrorResponse),
    ),
)]
async fn register(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    let normalized_email = request.email.trim().to_lowercase();

    tracing::trace!(
        target: TRACING_TARGET,
        email = %normalized_email,
        "registration attempt"
    );

    if pg_client.email_exists(&normalized_email).await? {
        tracing::warn!(
            target: TRACING_TARGET,
            email = %normalized_email,
            "registration failed: email already registered"
        );

        return Err(ErrorKind::Conflict
            .with_message("Email already registered")
            .with_resource("student")
            .into_static());
    }

    let new_student = NewStudent {
        first_name: request.first_name.trim().to_owned(),
        last_name: request.last_name.trim().to_owned(),
        email_address: normalized_email,
        phone_number: request.phone_number.trim().to_owned(),
        ..Default::default()
    };

    let student = pg_client.create_student(new_student).await?;

    tracing::info!(
        target: TRACING_TARGET,
        student_id = %student.id,
        email = %student.email_address,
        "student registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "Registration successful".to_owned(),
            student_id: student.id,
        }),
    ))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(register))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn rejects_short_first_name() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .post("/students/register")
            .json(&serde_json::json!({
                "firstName": "A",
                "lastName": "Example",
                "email": "alice@example.com",
                "phoneNumber": "03001234567"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn rejects_invalid_email() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .post("/students/register")
            .json(&serde_json::json!({
                "firstName": "Alice",
                "lastName": "Example",
                "email": "not-an-email",
                "phoneNumber": "03001234567"
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }
}
