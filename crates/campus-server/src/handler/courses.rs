//! Course listing and administration handlers.

use axum::extract::State;
use axum::http::StatusCode;
use campus_postgres::PgClient;
use campus_postgres::model::NewCourse;
use campus_postgres::query::{CourseRepository, EnrollmentRepository, Pagination};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;
use validator::Validate;

use crate::extract::{Json, Path, ValidateJson};
use crate::handler::response::CourseRecord;
use crate::handler::{ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Tracing target for course operations.
const TRACING_TARGET: &str = "campus_server::handler::courses";

/// Response carrying all courses.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CourseListResponse {
    /// Courses, newest first.
    pub courses: Vec<CourseRecord>,
}

/// Lists all courses.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/courses", tag = "courses",
    responses(
        (status = OK, description = "All courses", body = CourseListResponse),
    ),
)]
async fn list_courses(State(pg_client): State<PgClient>) -> Result<Json<CourseListResponse>> {
    let courses = pg_client
        .list_courses(Pagination::default())
        .await?
        .into_iter()
        .map(CourseRecord::from)
        .collect();

    Ok(Json(CourseListResponse { courses }))
}

/// Request payload for creating a course.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateCourseRequest {
    /// Unique course name.
    #[validate(length(min = 1, message = "Course name is required"))]
    pub name: String,
}

/// Response carrying a single course.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CourseResponse {
    /// The course.
    pub course: CourseRecord,
}

/// Creates a new course.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/courses", tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = CREATED, description = "Course created", body = CourseResponse),
        (status = BAD_REQUEST, description = "Course name missing", body = ErrorResponse),
        (status = CONFLICT, description = "Course already exists", body = ErrorResponse),
    ),
)]
async fn create_course(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CourseResponse>)> {
    let name = request.name.trim().to_owned();
    if name.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("Course name is required")
            .into_static());
    }

    if pg_client.find_course_by_name(&name).await?.is_some() {
        return Err(ErrorKind::Conflict
            .with_message("Course already exists")
            .with_resource("course")
            .into_static());
    }

    let course = pg_client.create_course(NewCourse { name }).await?;

    tracing::info!(
        target: TRACING_TARGET,
        course_id = %course.id,
        name = %course.name,
        "course created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CourseResponse {
            course: course.into(),
        }),
    ))
}

/// Response returned after deleting a course.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DeleteCourseResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Deletes a course.
///
/// Refused while enrollments still reference the course.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    delete, path = "/courses/{course_id}", tag = "courses",
    params(("course_id" = Uuid, Path, description = "Course to delete")),
    responses(
        (status = OK, description = "Course deleted", body = DeleteCourseResponse),
        (status = NOT_FOUND, description = "Course not found", body = ErrorResponse),
        (status = CONFLICT, description = "Course still has enrollments", body = ErrorResponse),
    ),
)]
async fn delete_course(
    State(pg_client): State<PgClient>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<DeleteCourseResponse>> {
    if pg_client.find_course(course_id).await?.is_none() {
        return Err(ErrorKind::NotFound
            .with_message("Course not found")
            .with_resource("course")
            .into_static());
    }

    let enrollments = pg_client.count_course_enrollments(course_id).await?;
    if enrollments > 0 {
        return Err(ErrorKind::Conflict
            .with_message("Cannot delete course with active enrollments")
            .with_resource("course")
            .into_static());
    }

    pg_client.delete_course(course_id).await?;

    tracing::info!(
        target: TRACING_TARGET,
        course_id = %course_id,
        "course deleted"
    );

    Ok(Json(DeleteCourseResponse {
        message: "Course deleted successfully".to_owned(),
    }))
}

/// Returns a [`Router`] with the public (read-only) routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new().routes(routes!(list_courses))
}

/// Returns a [`Router`] with the admin-gated routes.
///
/// [`Router`]: axum::routing::Router
pub fn admin_routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(create_course))
        .routes(routes!(delete_course))
}
