//! Authenticated student profile handler.

use axum::extract::State;
use campus_postgres::PgClient;
use campus_postgres::query::{EnrollmentRepository, StudentRepository};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::extract::{AuthSession, Json};
use crate::handler::response::{EnrollmentRecord, StudentRecord};
use crate::handler::{ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Tracing target for profile operations.
const TRACING_TARGET: &str = "campus_server::handler::profile";

/// Response carrying the logged-in student and their enrollments.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    /// The student record.
    pub student: StudentRecord,
    /// The student's enrollments with courses and slots.
    pub enrollments: Vec<EnrollmentRecord>,
}

/// Returns the authenticated student's profile.
///
/// Requires a valid session cookie issued by the verify-code flow.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/students/profile", tag = "students",
    responses(
        (status = OK, description = "Profile of the logged-in student", body = ProfileResponse),
        (status = UNAUTHORIZED, description = "Missing or invalid session cookie", body = ErrorResponse),
        (status = NOT_FOUND, description = "Account no longer exists", body = ErrorResponse),
    ),
)]
async fn fetch_profile(
    State(pg_client): State<PgClient>,
    session: AuthSession,
) -> Result<Json<ProfileResponse>> {
    let claims = session.claims();

    tracing::trace!(
        target: TRACING_TARGET,
        student_id = %claims.student_id,
        "profile fetch"
    );

    let student = pg_client
        .find_student(claims.student_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                target: TRACING_TARGET,
                student_id = %claims.student_id,
                "profile fetch failed: account vanished"
            );

            ErrorKind::NotFound
                .with_message("Student not found")
                .with_resource("student")
                .into_static()
        })?;

    let enrollments = pg_client
        .list_student_enrollments(student.id)
        .await?
        .into_iter()
        .map(EnrollmentRecord::from)
        .collect();

    Ok(Json(ProfileResponse {
        student: student.into(),
        enrollments,
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(fetch_profile))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::*;
    use crate::handler::test::create_test_server_with_router;

    #[tokio::test]
    async fn rejects_requests_without_cookie() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server.get("/students/profile").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }

    #[tokio::test]
    async fn rejects_garbage_cookie() -> anyhow::Result<()> {
        let server = create_test_server_with_router(routes()).await?;

        let response = server
            .get("/students/profile")
            .add_header("Cookie", "auth_token=garbage")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }
}
