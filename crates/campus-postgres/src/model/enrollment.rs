//! Enrollment model linking students to courses and time slots.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::enrollments;

/// An enrollment of a student into a course at a specific time slot.
///
/// The `(student_id, course_id, slot_id)` triple is unique; a student may
/// take the same course in at most one slot at a time.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Enrollment {
    /// Unique enrollment identifier.
    pub id: Uuid,
    /// Reference to the enrolled student.
    pub student_id: Uuid,
    /// Reference to the course.
    pub course_id: Uuid,
    /// Reference to the time slot.
    pub slot_id: Uuid,
    /// Timestamp when the enrollment was created.
    pub created_at: Timestamp,
}

/// Data for creating a new enrollment.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEnrollment {
    /// Reference to the enrolled student.
    pub student_id: Uuid,
    /// Reference to the course.
    pub course_id: Uuid,
    /// Reference to the time slot.
    pub slot_id: Uuid,
}
