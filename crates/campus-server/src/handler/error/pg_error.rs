//! Database error to HTTP error conversion.
//!
//! Converts [`PgError`]s into HTTP responses: recognized constraint
//! violations map to precise 409/404 answers, everything else collapses
//! into a logged 500. Store faults are never retried here; they surface
//! as the request's terminal outcome.

use campus_postgres::PgError;
use campus_postgres::types::{
    ConstraintViolation, CourseConstraints, EnrollmentConstraints, SlotConstraints,
    StudentConstraints,
};

use crate::handler::{Error, ErrorKind};

/// Tracing target for database error conversion.
const TRACING_TARGET: &str = "campus_server::postgres_constraints";

impl From<ConstraintViolation> for Error<'static> {
    fn from(constraint: ConstraintViolation) -> Self {
        match constraint {
            ConstraintViolation::Student(c) => c.into(),
            ConstraintViolation::Course(c) => c.into(),
            ConstraintViolation::Slot(c) => c.into(),
            ConstraintViolation::Enrollment(c) => c.into(),
        }
    }
}

impl From<StudentConstraints> for Error<'static> {
    fn from(constraint: StudentConstraints) -> Self {
        match constraint {
            StudentConstraints::EmailAddressKey => ErrorKind::Conflict
                .with_message("Email already registered")
                .with_resource("student"),
            StudentConstraints::StudentNumberKey => ErrorKind::Conflict
                .with_message("Student ID already exists")
                .with_resource("student"),
            // The code and its expiry must change together; hitting this
            // check means a write path is broken, not a client mistake.
            StudentConstraints::CodePairCheck => ErrorKind::InternalServerError
                .with_context("verification code fields updated independently"),
        }
    }
}

impl From<CourseConstraints> for Error<'static> {
    fn from(constraint: CourseConstraints) -> Self {
        match constraint {
            CourseConstraints::NameKey => ErrorKind::Conflict
                .with_message("Course already exists")
                .with_resource("course"),
        }
    }
}

impl From<SlotConstraints> for Error<'static> {
    fn from(constraint: SlotConstraints) -> Self {
        match constraint {
            SlotConstraints::NameKey => ErrorKind::Conflict
                .with_message("Slot already exists")
                .with_resource("slot"),
        }
    }
}

impl From<EnrollmentConstraints> for Error<'static> {
    fn from(constraint: EnrollmentConstraints) -> Self {
        match constraint {
            EnrollmentConstraints::StudentCourseSlotKey => ErrorKind::Conflict
                .with_message("Student already enrolled in this course-slot combination")
                .with_resource("enrollment"),
            EnrollmentConstraints::StudentFkey => ErrorKind::NotFound
                .with_message("Student not found")
                .with_resource("student"),
            EnrollmentConstraints::CourseFkey => ErrorKind::NotFound
                .with_message("Course not found")
                .with_resource("course"),
            EnrollmentConstraints::SlotFkey => ErrorKind::NotFound
                .with_message("Slot not found")
                .with_resource("slot"),
        }
    }
}

impl From<PgError> for Error<'static> {
    fn from(error: PgError) -> Self {
        match error {
            PgError::Config(config_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %config_error,
                    "database configuration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Timeout(timeout) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    timeout = ?timeout,
                    "database timeout",
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Connection(connection_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %connection_error,
                    "database connection error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Migration(migration_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %migration_error,
                    "database migration error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Query(ref query_error) => {
                // Try to extract a known constraint violation first
                if let Some(constraint_name) = error.constraint()
                    && let Some(constraint) = ConstraintViolation::new(constraint_name)
                {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        constraint = constraint_name,
                        error = %query_error,
                        "query error (constraint violation)"
                    );
                    return constraint.into();
                }

                tracing::error!(
                    target: TRACING_TARGET,
                    error = %query_error,
                    "query error"
                );
                ErrorKind::InternalServerError.into_error()
            }
            PgError::Unexpected(unexpected_error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %unexpected_error,
                    "unexpected database error"
                );
                ErrorKind::InternalServerError.into_error()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn unique_violations_map_to_conflict() {
        let violation = ConstraintViolation::new("students_email_address_key").unwrap();
        let error: Error<'static> = violation.into();
        assert_eq!(error.kind().status_code(), StatusCode::CONFLICT);
        assert_eq!(error.message(), Some("Email already registered"));
    }

    #[test]
    fn foreign_key_violations_map_to_not_found() {
        let violation = ConstraintViolation::new("enrollments_course_id_fkey").unwrap();
        let error: Error<'static> = violation.into();
        assert_eq!(error.kind().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(error.resource(), Some("course"));
    }

    #[test]
    fn code_pair_check_is_a_server_error() {
        let violation = ConstraintViolation::new("students_code_pair_check").unwrap();
        let error: Error<'static> = violation.into();
        assert_eq!(
            error.kind().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn generic_pg_errors_collapse_to_500() {
        let error: Error<'static> = PgError::Unexpected("boom".into()).into();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }
}
