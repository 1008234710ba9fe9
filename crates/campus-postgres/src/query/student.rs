//! Student repository for managing student database operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::Timestamp;
use uuid::Uuid;

use super::Pagination;
use crate::model::{NewStudent, Student, UpdateStudent};
use crate::{PgClient, PgError, PgResult, schema};

/// Repository for student database operations.
///
/// Handles student lifecycle plus the transient verification-code pair
/// used by the one-time-code login flow. The code pair always changes as
/// a unit: issuing overwrites both fields, consuming clears both.
pub trait StudentRepository {
    /// Creates a new student record.
    fn create_student(
        &self,
        new_student: NewStudent,
    ) -> impl Future<Output = PgResult<Student>> + Send;

    /// Finds a student by id.
    fn find_student(
        &self,
        student_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Student>>> + Send;

    /// Finds a student by (lowercased) email address.
    fn find_student_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Student>>> + Send;

    /// Returns whether a student with the given email exists.
    fn email_exists(&self, email: &str) -> impl Future<Output = PgResult<bool>> + Send;

    /// Returns whether a student with the given student number exists.
    fn student_number_exists(&self, number: &str)
    -> impl Future<Output = PgResult<bool>> + Send;

    /// Lists students, newest first.
    fn list_students(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Student>>> + Send;

    /// Updates a student's profile fields.
    fn update_student(
        &self,
        student_id: Uuid,
        updates: UpdateStudent,
    ) -> impl Future<Output = PgResult<Student>> + Send;

    /// Deletes a student. Returns true if a row was removed.
    fn delete_student(&self, student_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;

    /// Stores a freshly issued verification code and its expiry.
    ///
    /// Overwrites any previously pending pair: only the most recently
    /// issued code is ever valid.
    fn set_verification_code(
        &self,
        student_id: Uuid,
        code: &str,
        expires_at: Timestamp,
    ) -> impl Future<Output = PgResult<Student>> + Send;

    /// Consumes a pending verification code in a single conditional update.
    ///
    /// The row is updated only when the stored code matches `code` exactly
    /// and has not expired at `now`; the update marks the student verified
    /// and clears both code fields, so a code can never be consumed twice.
    ///
    /// Returns the updated student, or `None` when no row matched.
    fn consume_verification_code(
        &self,
        student_id: Uuid,
        code: &str,
        now: Timestamp,
    ) -> impl Future<Output = PgResult<Option<Student>>> + Send;
}

impl StudentRepository for PgClient {
    async fn create_student(&self, new_student: NewStudent) -> PgResult<Student> {
        let mut conn = self.get_connection().await?;

        use schema::students;

        diesel::insert_into(students::table)
            .values(&new_student)
            .returning(Student::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn find_student(&self, student_id: Uuid) -> PgResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        students::table
            .filter(dsl::id.eq(student_id))
            .select(Student::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_student_by_email(&self, email: &str) -> PgResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        students::table
            .filter(dsl::email_address.eq(email))
            .select(Student::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn email_exists(&self, email: &str) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use diesel::dsl::exists;
        use schema::students::{self, dsl};

        diesel::select(exists(
            students::table.filter(dsl::email_address.eq(email)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(PgError::from)
    }

    async fn student_number_exists(&self, number: &str) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use diesel::dsl::exists;
        use schema::students::{self, dsl};

        diesel::select(exists(
            students::table.filter(dsl::student_number.eq(number)),
        ))
        .get_result(&mut conn)
        .await
        .map_err(PgError::from)
    }

    async fn list_students(&self, pagination: Pagination) -> PgResult<Vec<Student>> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        students::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Student::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn update_student(
        &self,
        student_id: Uuid,
        updates: UpdateStudent,
    ) -> PgResult<Student> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        diesel::update(students::table.filter(dsl::id.eq(student_id)))
            .set(&updates)
            .returning(Student::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn delete_student(&self, student_id: Uuid) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        let rows_affected = diesel::delete(students::table.filter(dsl::id.eq(student_id)))
            .execute(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows_affected > 0)
    }

    async fn set_verification_code(
        &self,
        student_id: Uuid,
        code: &str,
        expires_at: Timestamp,
    ) -> PgResult<Student> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        diesel::update(students::table.filter(dsl::id.eq(student_id)))
            .set((
                dsl::verification_code.eq(Some(code)),
                dsl::code_expires_at.eq(Some(jiff_diesel::Timestamp::from(expires_at))),
            ))
            .returning(Student::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn consume_verification_code(
        &self,
        student_id: Uuid,
        code: &str,
        now: Timestamp,
    ) -> PgResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        use schema::students::{self, dsl};

        diesel::update(
            students::table
                .filter(dsl::id.eq(student_id))
                .filter(dsl::verification_code.eq(code))
                .filter(dsl::code_expires_at.gt(jiff_diesel::Timestamp::from(now))),
        )
        .set((
            dsl::is_verified.eq(true),
            dsl::verification_code.eq(None::<String>),
            dsl::code_expires_at.eq(None::<jiff_diesel::Timestamp>),
        ))
        .returning(Student::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(PgError::from)
    }
}
