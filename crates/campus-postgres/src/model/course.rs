//! Course model for PostgreSQL database operations.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::courses;

/// A course offered by the institute.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Course {
    /// Unique course identifier.
    pub id: Uuid,
    /// Unique human-readable course name.
    pub name: String,
    /// Timestamp when the course was created.
    pub created_at: Timestamp,
    /// Timestamp when the course was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new course.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewCourse {
    /// Unique human-readable course name.
    pub name: String,
}
