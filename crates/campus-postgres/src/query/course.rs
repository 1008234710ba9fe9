//! Course repository for managing course database operations.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use super::Pagination;
use crate::model::{Course, NewCourse};
use crate::{PgClient, PgError, PgResult, schema};

/// Repository for course database operations.
pub trait CourseRepository {
    /// Creates a new course.
    fn create_course(&self, new_course: NewCourse)
    -> impl Future<Output = PgResult<Course>> + Send;

    /// Finds a course by id.
    fn find_course(&self, course_id: Uuid)
    -> impl Future<Output = PgResult<Option<Course>>> + Send;

    /// Finds a course by its unique name.
    fn find_course_by_name(
        &self,
        name: &str,
    ) -> impl Future<Output = PgResult<Option<Course>>> + Send;

    /// Lists courses, newest first.
    fn list_courses(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<Course>>> + Send;

    /// Deletes a course. Returns true if a row was removed.
    fn delete_course(&self, course_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;
}

impl CourseRepository for PgClient {
    async fn create_course(&self, new_course: NewCourse) -> PgResult<Course> {
        let mut conn = self.get_connection().await?;

        use schema::courses;

        diesel::insert_into(courses::table)
            .values(&new_course)
            .returning(Course::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn find_course(&self, course_id: Uuid) -> PgResult<Option<Course>> {
        let mut conn = self.get_connection().await?;

        use schema::courses::{self, dsl};

        courses::table
            .filter(dsl::id.eq(course_id))
            .select(Course::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_course_by_name(&self, name: &str) -> PgResult<Option<Course>> {
        let mut conn = self.get_connection().await?;

        use schema::courses::{self, dsl};

        courses::table
            .filter(dsl::name.eq(name))
            .select(Course::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_courses(&self, pagination: Pagination) -> PgResult<Vec<Course>> {
        let mut conn = self.get_connection().await?;

        use schema::courses::{self, dsl};

        courses::table
            .order(dsl::created_at.desc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .select(Course::as_select())
            .load(&mut conn)
            .await
            .map_err(PgError::from)
    }

    async fn delete_course(&self, course_id: Uuid) -> PgResult<bool> {
        let mut conn = self.get_connection().await?;

        use schema::courses::{self, dsl};

        let rows_affected = diesel::delete(courses::table.filter(dsl::id.eq(course_id)))
            .execute(&mut conn)
            .await
            .map_err(PgError::from)?;

        Ok(rows_affected > 0)
    }
}
