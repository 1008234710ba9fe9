//! Admin enrollment management handlers.

use axum::extract::State;
use axum::http::StatusCode;
use campus_postgres::PgClient;
use campus_postgres::model::NewEnrollment;
use campus_postgres::query::{
    CourseRepository, EnrollmentRepository, SlotRepository, StudentRepository,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;

use crate::extract::{Json, Path};
use crate::handler::response::EnrollmentRecord;
use crate::handler::{ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Tracing target for enrollment operations.
const TRACING_TARGET: &str = "campus_server::handler::enrollments";

/// Request payload for enrolling a student.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateEnrollmentRequest {
    /// Course to enroll into.
    pub course_id: Uuid,
    /// Time slot for the enrollment.
    pub slot_id: Uuid,
}

/// Response carrying a single enrollment.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct EnrollmentResponse {
    /// The created enrollment with its course and slot.
    pub enrollment: EnrollmentRecord,
}

/// Enrolls a student into a course at a time slot.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/admin/students/{student_id}/enrollments", tag = "admin",
    params(("student_id" = Uuid, Path, description = "Student to enroll")),
    request_body = CreateEnrollmentRequest,
    responses(
        (status = CREATED, description = "Enrollment created", body = EnrollmentResponse),
        (status = NOT_FOUND, description = "Student, course or slot not found", body = ErrorResponse),
        (status = CONFLICT, description = "Student already enrolled in this course-slot combination", body = ErrorResponse),
    ),
)]
async fn create_enrollment(
    State(pg_client): State<PgClient>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentResponse>)> {
    if pg_client.find_student(student_id).await?.is_none() {
        return Err(ErrorKind::NotFound
            .with_message("Student not found")
            .with_resource("student")
            .into_static());
    }

    let Some(course) = pg_client.find_course(request.course_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Course not found")
            .with_resource("course")
            .into_static());
    };

    let Some(slot) = pg_client.find_slot(request.slot_id).await? else {
        return Err(ErrorKind::NotFound
            .with_message("Slot not found")
            .with_resource("slot")
            .into_static());
    };

    if pg_client
        .enrollment_exists(student_id, course.id, slot.id)
        .await?
    {
        return Err(ErrorKind::Conflict
            .with_message("Student already enrolled in this course-slot combination")
            .with_resource("enrollment")
            .into_static());
    }

    let enrollment = pg_client
        .create_enrollment(NewEnrollment {
            student_id,
            course_id: course.id,
            slot_id: slot.id,
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        enrollment_id = %enrollment.id,
        student_id = %student_id,
        course_id = %course.id,
        slot_id = %slot.id,
        "enrollment created"
    );

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentResponse {
            enrollment: (enrollment, course, slot).into(),
        }),
    ))
}

/// Response returned after removing an enrollment.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DeleteEnrollmentResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Removes a student's enrollment.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    delete, path = "/admin/students/{student_id}/enrollments/{enrollment_id}", tag = "admin",
    params(
        ("student_id" = Uuid, Path, description = "Student the enrollment belongs to"),
        ("enrollment_id" = Uuid, Path, description = "Enrollment to remove"),
    ),
    responses(
        (status = OK, description = "Enrollment removed", body = DeleteEnrollmentResponse),
        (status = NOT_FOUND, description = "Enrollment not found", body = ErrorResponse),
    ),
)]
async fn delete_enrollment(
    State(pg_client): State<PgClient>,
    Path((student_id, enrollment_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<DeleteEnrollmentResponse>> {
    if !pg_client.delete_enrollment(enrollment_id, student_id).await? {
        return Err(ErrorKind::NotFound
            .with_message("Enrollment not found")
            .with_resource("enrollment")
            .into_static());
    }

    tracing::info!(
        target: TRACING_TARGET,
        enrollment_id = %enrollment_id,
        student_id = %student_id,
        "enrollment removed"
    );

    Ok(Json(DeleteEnrollmentResponse {
        message: "Enrollment removed successfully".to_owned(),
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(create_enrollment))
        .routes(routes!(delete_enrollment))
}
