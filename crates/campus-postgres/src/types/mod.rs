//! Contains constraint mappings and other custom types.

mod constraint;

pub use constraint::{
    ConstraintViolation, CourseConstraints, EnrollmentConstraints, SlotConstraints,
    StudentConstraints,
};
