//! Shared response types for HTTP handlers.

mod error_response;
mod student;

pub use error_response::ErrorResponse;
pub use student::{
    CourseRecord, EnrollmentRecord, SlotRecord, StudentDetails, StudentRecord, StudentSummary,
};
