//! Admin student management handlers.
//!
//! Administrators list, create, update and delete students, change their
//! email addresses and bulk-import rosters. Admin-created students are
//! pre-verified; they never go through the email code flow for their
//! first login.

use axum::extract::State;
use axum::http::StatusCode;
use campus_postgres::PgClient;
use campus_postgres::model::{NewEnrollment, NewStudent, UpdateStudent};
use campus_postgres::query::{
    CourseRepository, EnrollmentRepository, Pagination, SlotRepository, StudentRepository,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use uuid::Uuid;
use validator::Validate;

use crate::extract::{Json, Path, Query, ValidateJson};
use crate::handler::response::{EnrollmentRecord, StudentDetails, StudentRecord};
use crate::handler::{Error, ErrorKind, ErrorResponse, Result};
use crate::service::ServiceState;

/// Tracing target for admin student operations.
const TRACING_TARGET: &str = "campus_server::handler::students";

/// Builds the standard missing-student error.
fn student_not_found() -> Error<'static> {
    ErrorKind::NotFound
        .with_message("Student not found")
        .with_resource("student")
        .into_static()
}

/// Loads a student's enrollments into a details record.
async fn with_enrollments(
    pg_client: &PgClient,
    student: campus_postgres::model::Student,
) -> Result<StudentDetails> {
    let enrollments = pg_client
        .list_student_enrollments(student.id)
        .await?
        .into_iter()
        .map(EnrollmentRecord::from)
        .collect();

    Ok(StudentDetails {
        student: student.into(),
        enrollments,
    })
}

/// Query parameters for listing students.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
struct ListStudentsQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size (1-1000).
    pub page_size: Option<i64>,
}

/// Response carrying a page of students.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct StudentListResponse {
    /// Students with their enrollments, newest first.
    pub students: Vec<StudentDetails>,
}

/// Lists students with their enrollments.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    get, path = "/admin/students", tag = "admin",
    params(ListStudentsQuery),
    responses(
        (status = OK, description = "Students with enrollments", body = StudentListResponse),
        (status = UNAUTHORIZED, description = "Admin authentication missing", body = ErrorResponse),
    ),
)]
async fn list_students(
    State(pg_client): State<PgClient>,
    Query(query): Query<ListStudentsQuery>,
) -> Result<Json<StudentListResponse>> {
    let pagination = match (query.page, query.page_size) {
        (None, None) => Pagination::default(),
        (page, page_size) => Pagination::from_page(page.unwrap_or(1), page_size.unwrap_or(50)),
    };

    let mut students = Vec::new();
    for student in pg_client.list_students(pagination).await? {
        students.push(with_enrollments(&pg_client, student).await?);
    }

    Ok(Json(StudentListResponse { students }))
}

/// Request payload for creating a student.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateStudentRequest {
    /// Given name.
    #[validate(length(min = 1, message = "All fields are required"))]
    pub first_name: String,
    /// Family name.
    #[validate(length(min = 1, message = "All fields are required"))]
    pub last_name: String,
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    /// Contact phone number.
    #[validate(length(min = 1, message = "All fields are required"))]
    pub phone_number: String,
    /// Institutional student number.
    #[validate(length(min = 1, message = "All fields are required"))]
    pub student_number: String,
}

/// Response carrying a single student with enrollments.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct StudentResponse {
    /// The student with enrollments.
    pub student: StudentDetails,
}

/// Creates a pre-verified student.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/admin/students", tag = "admin",
    request_body = CreateStudentRequest,
    responses(
        (status = CREATED, description = "Student created", body = StudentResponse),
        (status = BAD_REQUEST, description = "Missing or invalid fields", body = ErrorResponse),
        (status = CONFLICT, description = "Email or student number already exists", body = ErrorResponse),
    ),
)]
async fn create_student(
    State(pg_client): State<PgClient>,
    ValidateJson(request): ValidateJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>)> {
    let normalized_email = request.email.trim().to_lowercase();
    let student_number = request.student_number.trim().to_owned();

    if pg_client.email_exists(&normalized_email).await? {
        return Err(ErrorKind::Conflict
            .with_message("Email already registered")
            .with_resource("student")
            .into_static());
    }

    if pg_client.student_number_exists(&student_number).await? {
        return Err(ErrorKind::Conflict
            .with_message("Student ID already exists")
            .with_resource("student")
            .into_static());
    }

    let new_student = NewStudent {
        first_name: request.first_name.trim().to_owned(),
        last_name: request.last_name.trim().to_owned(),
        email_address: normalized_email,
        phone_number: request.phone_number.trim().to_owned(),
        student_number: Some(student_number),
        // Admin-added students are pre-verified
        is_verified: Some(true),
    };

    let student = pg_client.create_student(new_student).await?;

    tracing::info!(
        target: TRACING_TARGET,
        student_id = %student.id,
        email = %student.email_address,
        "student created by admin"
    );

    let details = with_enrollments(&pg_client, student).await?;
    Ok((StatusCode::CREATED, Json(StudentResponse { student: details })))
}

/// Request payload for updating a student's profile fields.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateStudentRequest {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Institutional student number.
    pub student_number: Option<String>,
    /// URL of the ID-card photo.
    pub photo_url: Option<String>,
}

/// Updates a student's profile fields.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    put, path = "/admin/students/{student_id}", tag = "admin",
    params(("student_id" = Uuid, Path, description = "Student to update")),
    request_body = UpdateStudentRequest,
    responses(
        (status = OK, description = "Student updated", body = StudentResponse),
        (status = BAD_REQUEST, description = "No fields to update", body = ErrorResponse),
        (status = NOT_FOUND, description = "Student not found", body = ErrorResponse),
    ),
)]
async fn update_student(
    State(pg_client): State<PgClient>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>> {
    let updates = UpdateStudent {
        first_name: request.first_name,
        last_name: request.last_name,
        phone_number: request.phone_number,
        student_number: request.student_number,
        photo_url: request.photo_url,
        ..Default::default()
    };

    let no_changes = updates.first_name.is_none()
        && updates.last_name.is_none()
        && updates.phone_number.is_none()
        && updates.student_number.is_none()
        && updates.photo_url.is_none();

    if no_changes {
        return Err(ErrorKind::BadRequest
            .with_message("No fields to update")
            .into_static());
    }

    if pg_client.find_student(student_id).await?.is_none() {
        return Err(student_not_found());
    }

    let student = pg_client.update_student(student_id, updates).await?;

    tracing::info!(
        target: TRACING_TARGET,
        student_id = %student.id,
        "student updated by admin"
    );

    let details = with_enrollments(&pg_client, student).await?;
    Ok(Json(StudentResponse { student: details }))
}

/// Request payload for changing a student's email address.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateEmailRequest {
    /// New email address.
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Response returned after changing an email address.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UpdateEmailResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// The updated student.
    pub student: StudentRecord,
}

/// Changes a student's email address.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    patch, path = "/admin/students/{student_id}/email", tag = "admin",
    params(("student_id" = Uuid, Path, description = "Student to update")),
    request_body = UpdateEmailRequest,
    responses(
        (status = OK, description = "Email updated", body = UpdateEmailResponse),
        (status = BAD_REQUEST, description = "Invalid email format", body = ErrorResponse),
        (status = NOT_FOUND, description = "Student not found", body = ErrorResponse),
        (status = CONFLICT, description = "Email already in use", body = ErrorResponse),
    ),
)]
async fn update_student_email(
    State(pg_client): State<PgClient>,
    Path(student_id): Path<Uuid>,
    ValidateJson(request): ValidateJson<UpdateEmailRequest>,
) -> Result<Json<UpdateEmailResponse>> {
    let normalized_email = request.email.trim().to_lowercase();

    if pg_client.find_student(student_id).await?.is_none() {
        return Err(student_not_found());
    }

    if let Some(existing) = pg_client.find_student_by_email(&normalized_email).await?
        && existing.id != student_id
    {
        return Err(ErrorKind::Conflict
            .with_message("Email already in use")
            .with_resource("student")
            .into_static());
    }

    let updates = UpdateStudent {
        email_address: Some(normalized_email),
        ..Default::default()
    };
    let student = pg_client.update_student(student_id, updates).await?;

    tracing::info!(
        target: TRACING_TARGET,
        student_id = %student.id,
        "student email updated by admin"
    );

    Ok(Json(UpdateEmailResponse {
        message: "Email updated successfully".to_owned(),
        student: student.into(),
    }))
}

/// Response returned after deleting a student.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct DeleteStudentResponse {
    /// Human-readable confirmation.
    pub message: String,
}

/// Deletes a student and their enrollments.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    delete, path = "/admin/students/{student_id}", tag = "admin",
    params(("student_id" = Uuid, Path, description = "Student to delete")),
    responses(
        (status = OK, description = "Student deleted", body = DeleteStudentResponse),
        (status = NOT_FOUND, description = "Student not found", body = ErrorResponse),
    ),
)]
async fn delete_student(
    State(pg_client): State<PgClient>,
    Path(student_id): Path<Uuid>,
) -> Result<Json<DeleteStudentResponse>> {
    // Enrollments cascade with the student row.
    if !pg_client.delete_student(student_id).await? {
        return Err(student_not_found());
    }

    tracing::info!(
        target: TRACING_TARGET,
        student_id = %student_id,
        "student deleted by admin"
    );

    Ok(Json(DeleteStudentResponse {
        message: "Student deleted successfully".to_owned(),
    }))
}

/// One row of a bulk roster import.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct BulkStudentRow {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Institutional student number.
    pub student_number: String,
    /// Optional course name to enroll into.
    pub course: Option<String>,
    /// Optional slot name for the enrollment.
    pub slot: Option<String>,
}

/// Request payload for bulk roster import.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct BulkImportRequest {
    /// Roster rows to import.
    pub students: Vec<BulkStudentRow>,
}

/// A failed bulk-import row.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct BulkImportError {
    /// Student number of the failed row, or "unknown".
    pub student_number: String,
    /// What went wrong.
    pub error: String,
}

/// Response summarizing a bulk import.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct BulkImportResponse {
    /// Rows imported successfully.
    pub imported: usize,
    /// Rows that failed.
    pub failed: usize,
    /// Per-row failure details.
    pub errors: Vec<BulkImportError>,
}

/// Imports a roster of students, best-effort.
///
/// Each row is created independently; failures are reported per row and
/// do not abort the rest of the import. Rows naming a course and slot
/// are enrolled when both exist.
#[tracing::instrument(skip_all)]
#[utoipa::path(
    post, path = "/admin/students/bulk-import", tag = "admin",
    request_body = BulkImportRequest,
    responses(
        (status = OK, description = "Import summary", body = BulkImportResponse),
        (status = BAD_REQUEST, description = "No students provided", body = ErrorResponse),
    ),
)]
async fn bulk_import(
    State(pg_client): State<PgClient>,
    Json(request): Json<BulkImportRequest>,
) -> Result<Json<BulkImportResponse>> {
    if request.students.is_empty() {
        return Err(ErrorKind::BadRequest
            .with_message("No students provided")
            .into_static());
    }

    let mut imported = 0usize;
    let mut errors = Vec::new();

    for row in request.students {
        match import_row(&pg_client, &row).await {
            Ok(()) => imported += 1,
            Err(reason) => {
                let student_number = if row.student_number.trim().is_empty() {
                    "unknown".to_owned()
                } else {
                    row.student_number.trim().to_owned()
                };

                errors.push(BulkImportError {
                    student_number,
                    error: reason,
                });
            }
        }
    }

    tracing::info!(
        target: TRACING_TARGET,
        imported,
        failed = errors.len(),
        "bulk import finished"
    );

    Ok(Json(BulkImportResponse {
        imported,
        failed: errors.len(),
        errors,
    }))
}

/// Imports a single roster row; the error is the user-facing reason.
async fn import_row(pg_client: &PgClient, row: &BulkStudentRow) -> std::result::Result<(), String> {
    let first_name = row.first_name.trim();
    let last_name = row.last_name.trim();
    let email = row.email.trim().to_lowercase();
    let phone_number = row.phone_number.trim();
    let student_number = row.student_number.trim();

    if first_name.is_empty()
        || last_name.is_empty()
        || email.is_empty()
        || phone_number.is_empty()
        || student_number.is_empty()
    {
        return Err("Missing required student fields".to_owned());
    }

    if !email.contains('@') {
        return Err("Invalid email format".to_owned());
    }

    let email_taken = pg_client
        .email_exists(&email)
        .await
        .map_err(|e| e.to_string())?;
    let number_taken = pg_client
        .student_number_exists(student_number)
        .await
        .map_err(|e| e.to_string())?;

    if email_taken || number_taken {
        return Err("Student ID or email already exists".to_owned());
    }

    let new_student = NewStudent {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email_address: email,
        phone_number: phone_number.to_owned(),
        student_number: Some(student_number.to_owned()),
        is_verified: Some(true),
    };

    let student = pg_client
        .create_student(new_student)
        .await
        .map_err(|e| e.to_string())?;

    // Optional enrollment when both names are present and resolvable.
    if let (Some(course_name), Some(slot_name)) = (&row.course, &row.slot) {
        let course = pg_client
            .find_course_by_name(course_name.trim())
            .await
            .map_err(|e| e.to_string())?;
        let slot = pg_client
            .find_slot_by_name(slot_name.trim())
            .await
            .map_err(|e| e.to_string())?;

        if let (Some(course), Some(slot)) = (course, slot) {
            pg_client
                .create_enrollment(NewEnrollment {
                    student_id: student.id,
                    course_id: course.id,
                    slot_id: slot.id,
                })
                .await
                .map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> OpenApiRouter<ServiceState> {
    OpenApiRouter::new()
        .routes(routes!(list_students, create_student))
        .routes(routes!(bulk_import))
        .routes(routes!(update_student, delete_student))
        .routes(routes!(update_student_email))
}
