//! Enrollment repository for managing enrollment database operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{Course, Enrollment, NewEnrollment, Slot};
use crate::{PgClient, PgError, PgResult, schema};

/// An enrollment joined with its course and time slot.
pub type EnrollmentDetails = (Enrollment, Course, Slot);

/// Repository for enrollment database operations.
pub trait EnrollmentRepository {
    /// Creates a new enrollment.
    fn create_enrollment(
        &self,
        new_enrollment: NewEnrollment,
    ) -> impl Future<Output = PgResult<Enrollment>> + Send;

    /// Finds an enrollment by id.
    fn find_enrollment(
        &self,
        enrollment_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Enrollment>>> + Send;

    /// Returns whether the exact (student, course, slot) triple exists.
    fn enrollment_exists(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        slot_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists a student's enrollments with their courses and slots.
    fn list_student_enrollments(
        &self,
        student_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<EnrollmentDetails>>> + Send;

    /// Deletes a student's enrollment. Returns true if a row was removed.
    fn delete_enrollment(
        &self,
        enrollment_id: Uuid,
        student_id: Uuid,
    ) -> impl Future<Output = PgResult<bool>> + Send;

    /// Counts enrollments referencing a course.
    fn count_course_enrollments(
        &self,
        course_id: Uuid,
    ) -> impl Future<Output = PgResult<i64>> + Send;

    /// Counts enrollments referencing a slot.
    fn count_slot_enrollments(&self, slot_id: Uuid)
    -> impl Future<Output = PgResult<i64>> + Send;
}

impl EnrollmentRepository for PgClient {
    async fn create_enrollment(&self, new_enrollment: NewEnrollment) -> PgResult<Enrollment> {
        let mut conn = self.get_connection().await?;

        use schema::enrollments;

        diesel::insert_into(enrollments::table)
            .values(&new_enrollment)
            .returning(Enrollment::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn find_enrollment(&self, enrollment_id: Uuid) -> PgResult<Option<Enrollment>> {
        let mut conn = self.get_connection().await?;

        use schema::enrollments::{self, dsl};

        enrollments::table
            .filter(dsl::id.eq(enrollment_id))
            .select(Enrollment::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn enrollment_exists(
        &self,
        student_id: Uuid,
        course_id: Uuid,
        slot_id: Uuid,
    ) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use diesel::dsl::exists;
        use schema::enrollments::{self, dsl};

        diesel::select(exists(
            enrollments::table
                .filter(dsl::student_id.eq(student_id))
                .filter(dsl::course_id.eq(course_id))
                .filter(dsl::slot_id.eq(slot_id)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(PgError::from)
    }

    async fn list_student_enrollments(
        &self,
        student_id: Uuid,
    ) -> PgResult<Vec<EnrollmentDetails>> {
        let mut conn = self.get_connection().await?;

        use schema::{courses, enrollments, slots};

        enrollments::table
            .inner_join(courses::table)
            .inner_join(slots::table)
            .filter(enrollments::dsl::student_id.eq(student_id))
            .order(enrollments::dsl::created_at.desc())
            .select((
                Enrollment::as_select(),
                Course::as_select(),
                Slot::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn delete_enrollment(&self, enrollment_id: Uuid, student_id: Uuid) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use schema::enrollments::{self, dsl};

        let rows_affected = diesel::delete(
            enrollments::table
                .filter(dsl::id.eq(enrollment_id))
                .filter(dsl::student_id.eq(student_id)),
        )
        .execute(&mut conn)
        .await
        .map_err(PgError::from)?;

        Ok(rows_affected > 0)
    }

    async fn count_course_enrollments(&self, course_id: Uuid) -> PgResult<i64> {
        let mut conn = self.get_connection().await?;

        use schema::enrollments::{self, dsl};

        enrollments::table
            .filter(dsl::course_id.eq(course_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn count_slot_enrollments(&self, slot_id: Uuid) -> PgResult<i64> {
        let mut conn = self.get_connection().await?;

        use schema::enrollments::{self, dsl};

        enrollments::table
            .filter(dsl::slot_id.eq(slot_id))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }
}
