//! Response types for student, course, slot and enrollment records.

use campus_postgres::model::{Course, Slot, Student};
use campus_postgres::query::EnrollmentDetails;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Compact student identity returned by authentication endpoints.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    /// ID of the student.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            email: student.email_address,
        }
    }
}

/// Full student profile record.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// ID of the student.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email_address: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Institutional student number, if assigned.
    pub student_number: Option<String>,
    /// URL of the ID-card photo, if uploaded.
    pub photo_url: Option<String>,
    /// Whether the student has verified their email address.
    pub is_verified: bool,
    /// Timestamp when the student registered.
    #[schema(value_type = String)]
    pub created_at: jiff::Timestamp,
}

impl From<Student> for StudentRecord {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            first_name: student.first_name,
            last_name: student.last_name,
            email_address: student.email_address,
            phone_number: student.phone_number,
            student_number: student.student_number,
            photo_url: student.photo_url,
            is_verified: student.is_verified,
            created_at: student.created_at.into(),
        }
    }
}

/// Course record.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    /// ID of the course.
    pub id: Uuid,
    /// Course name.
    pub name: String,
    /// Timestamp when the course was created.
    #[schema(value_type = String)]
    pub created_at: jiff::Timestamp,
}

impl From<Course> for CourseRecord {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            created_at: course.created_at.into(),
        }
    }
}

/// Time slot record.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    /// ID of the slot.
    pub id: Uuid,
    /// Slot name.
    pub name: String,
    /// Timestamp when the slot was created.
    #[schema(value_type = String)]
    pub created_at: jiff::Timestamp,
}

impl From<Slot> for SlotRecord {
    fn from(slot: Slot) -> Self {
        Self {
            id: slot.id,
            name: slot.name,
            created_at: slot.created_at.into(),
        }
    }
}

/// An enrollment with its course and slot.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    /// ID of the enrollment.
    pub id: Uuid,
    /// The enrolled course.
    pub course: CourseRecord,
    /// The time slot.
    pub slot: SlotRecord,
    /// Timestamp when the enrollment was created.
    #[schema(value_type = String)]
    pub created_at: jiff::Timestamp,
}

impl From<EnrollmentDetails> for EnrollmentRecord {
    fn from((enrollment, course, slot): EnrollmentDetails) -> Self {
        Self {
            id: enrollment.id,
            course: course.into(),
            slot: slot.into(),
            created_at: enrollment.created_at.into(),
        }
    }
}

/// A student together with their enrollments.
#[must_use]
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    /// The student record.
    pub student: StudentRecord,
    /// The student's enrollments.
    pub enrollments: Vec<EnrollmentRecord>,
}
