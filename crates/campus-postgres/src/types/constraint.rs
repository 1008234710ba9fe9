//! Named database constraints mapped to structured violations.
//!
//! Postgres reports violated constraints by name; these enums give each
//! known name a typed representation so the HTTP layer can translate a
//! failed insert or update into the right status code instead of a
//! generic 500.

use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Constraints on the `students` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
pub enum StudentConstraints {
    /// Unique email address.
    #[strum(serialize = "students_email_address_key")]
    EmailAddressKey,
    /// Unique student number.
    #[strum(serialize = "students_student_number_key")]
    StudentNumberKey,
    /// The code and its expiry are both present or both absent.
    #[strum(serialize = "students_code_pair_check")]
    CodePairCheck,
}

/// Constraints on the `courses` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
pub enum CourseConstraints {
    /// Unique course name.
    #[strum(serialize = "courses_name_key")]
    NameKey,
}

/// Constraints on the `slots` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
pub enum SlotConstraints {
    /// Unique slot name.
    #[strum(serialize = "slots_name_key")]
    NameKey,
}

/// Constraints on the `enrollments` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
pub enum EnrollmentConstraints {
    /// Unique (student, course, slot) triple.
    #[strum(serialize = "enrollments_student_course_slot_key")]
    StudentCourseSlotKey,
    /// Enrollments must reference an existing student.
    #[strum(serialize = "enrollments_student_id_fkey")]
    StudentFkey,
    /// Enrollments must reference an existing course.
    #[strum(serialize = "enrollments_course_id_fkey")]
    CourseFkey,
    /// Enrollments must reference an existing slot.
    #[strum(serialize = "enrollments_slot_id_fkey")]
    SlotFkey,
}

/// A violated constraint, categorized by the table it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintViolation {
    /// A `students` table constraint.
    Student(StudentConstraints),
    /// A `courses` table constraint.
    Course(CourseConstraints),
    /// A `slots` table constraint.
    Slot(SlotConstraints),
    /// An `enrollments` table constraint.
    Enrollment(EnrollmentConstraints),
}

impl ConstraintViolation {
    /// Resolves a raw Postgres constraint name into a known violation.
    ///
    /// Returns `None` for constraint names this layer does not recognize.
    pub fn new(constraint_name: &str) -> Option<Self> {
        if let Ok(constraint) = constraint_name.parse::<StudentConstraints>() {
            return Some(Self::Student(constraint));
        }

        if let Ok(constraint) = constraint_name.parse::<CourseConstraints>() {
            return Some(Self::Course(constraint));
        }

        if let Ok(constraint) = constraint_name.parse::<SlotConstraints>() {
            return Some(Self::Slot(constraint));
        }

        if let Ok(constraint) = constraint_name.parse::<EnrollmentConstraints>() {
            return Some(Self::Enrollment(constraint));
        }

        None
    }

    /// Returns the raw Postgres constraint name.
    pub fn constraint_name(&self) -> &'static str {
        match self {
            Self::Student(constraint) => constraint.into(),
            Self::Course(constraint) => constraint.into(),
            Self::Slot(constraint) => constraint.into(),
            Self::Enrollment(constraint) => constraint.into(),
        }
    }

    /// Returns whether this violation represents a uniqueness conflict.
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            Self::Student(StudentConstraints::EmailAddressKey)
                | Self::Student(StudentConstraints::StudentNumberKey)
                | Self::Course(CourseConstraints::NameKey)
                | Self::Slot(SlotConstraints::NameKey)
                | Self::Enrollment(EnrollmentConstraints::StudentCourseSlotKey)
        )
    }

    /// Returns whether this violation represents a missing referenced row.
    pub fn is_foreign_key_violation(&self) -> bool {
        matches!(
            self,
            Self::Enrollment(EnrollmentConstraints::StudentFkey)
                | Self::Enrollment(EnrollmentConstraints::CourseFkey)
                | Self::Enrollment(EnrollmentConstraints::SlotFkey)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_constraint_names() {
        assert_eq!(
            ConstraintViolation::new("students_email_address_key"),
            Some(ConstraintViolation::Student(
                StudentConstraints::EmailAddressKey
            ))
        );
        assert_eq!(
            ConstraintViolation::new("enrollments_student_course_slot_key"),
            Some(ConstraintViolation::Enrollment(
                EnrollmentConstraints::StudentCourseSlotKey
            ))
        );
    }

    #[test]
    fn unknown_names_resolve_to_none() {
        assert_eq!(ConstraintViolation::new("no_such_constraint"), None);
        assert_eq!(ConstraintViolation::new(""), None);
    }

    #[test]
    fn round_trips_constraint_names() {
        let names = [
            "students_email_address_key",
            "students_student_number_key",
            "students_code_pair_check",
            "courses_name_key",
            "slots_name_key",
            "enrollments_student_course_slot_key",
            "enrollments_student_id_fkey",
            "enrollments_course_id_fkey",
            "enrollments_slot_id_fkey",
        ];

        for name in names {
            let violation = ConstraintViolation::new(name).expect(name);
            assert_eq!(violation.constraint_name(), name);
        }
    }

    #[test]
    fn categorizes_violations() {
        let unique = ConstraintViolation::new("courses_name_key").unwrap();
        assert!(unique.is_unique_violation());
        assert!(!unique.is_foreign_key_violation());

        let fkey = ConstraintViolation::new("enrollments_course_id_fkey").unwrap();
        assert!(fkey.is_foreign_key_violation());
        assert!(!fkey.is_unique_violation());
    }
}
