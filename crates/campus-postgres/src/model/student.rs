//! Student account model for PostgreSQL database operations.
//!
//! The student row carries the transient email-verification state used by
//! the one-time-code login flow: a pending numeric code and its absolute
//! expiry. Both fields are set together when a code is issued and cleared
//! together when it is consumed or overwritten.
//!
//! ## Models
//!
//! - [`Student`] - Main student model with verification state
//! - [`NewStudent`] - Data structure for creating new students
//! - [`UpdateStudent`] - Data structure for updating profile fields

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::students;

/// Main student model representing a registered student.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Student {
    /// Unique student identifier.
    pub id: Uuid,
    /// Given name (2-100 characters).
    pub first_name: String,
    /// Family name (2-100 characters).
    pub last_name: String,
    /// Primary email for login and communications (unique, lowercased).
    pub email_address: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Institutional student number, assigned by administrators.
    pub student_number: Option<String>,
    /// Optional URL to the ID-card photo.
    pub photo_url: Option<String>,
    /// Whether the student has proven control of their email address.
    pub is_verified: bool,
    /// Pending one-time login code, if one has been issued.
    pub verification_code: Option<String>,
    /// Absolute expiry of the pending code; paired 1:1 with the code.
    pub code_expires_at: Option<Timestamp>,
    /// Timestamp when the student was created.
    pub created_at: Timestamp,
    /// Timestamp when the student was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new student.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewStudent {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Primary email for login and communications (lowercased).
    pub email_address: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Institutional student number.
    pub student_number: Option<String>,
    /// Verification status; admin-created students are pre-verified.
    pub is_verified: Option<bool>,
}

/// Data for updating a student.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateStudent {
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Primary email for login and communications.
    pub email_address: Option<String>,
    /// Contact phone number.
    pub phone_number: Option<String>,
    /// Institutional student number.
    pub student_number: Option<String>,
    /// URL to the ID-card photo.
    pub photo_url: Option<String>,
    /// Verification status.
    pub is_verified: Option<bool>,
}

impl Student {
    /// Returns the name used in emails and on the rendered ID card.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns whether a one-time code is currently pending.
    ///
    /// The code and its expiry are stored as a pair; a row with only one
    /// of the two set is corrupt and treated as having no pending code.
    pub fn has_pending_code(&self) -> bool {
        self.verification_code.is_some() && self.code_expires_at.is_some()
    }

    /// Returns whether the pending code has expired at `now`.
    ///
    /// A missing expiry counts as expired: there is nothing to verify.
    pub fn code_expired(&self, now: jiff::Timestamp) -> bool {
        match self.code_expires_at {
            Some(expires_at) => now >= jiff::Timestamp::from(expires_at),
            None => true,
        }
    }

    /// Returns whether `submitted` verifies against the pending code at `now`.
    ///
    /// The comparison is an exact string match with no normalization, and
    /// only succeeds while the code is unexpired. Callers must not reveal
    /// which of the conditions failed.
    pub fn accepts_code(&self, submitted: &str, now: jiff::Timestamp) -> bool {
        let Some(pending) = self.verification_code.as_deref() else {
            return false;
        };

        pending == submitted && !self.code_expired(now)
    }

    /// Returns whether the student still needs email verification.
    pub fn needs_verification(&self) -> bool {
        !self.is_verified
    }

    /// Returns whether the student has a student number assigned.
    pub fn has_student_number(&self) -> bool {
        self.student_number
            .as_deref()
            .is_some_and(|number| !number.is_empty())
    }

    /// Returns whether the student has an ID-card photo configured.
    pub fn has_photo(&self) -> bool {
        self.photo_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};

    use super::*;

    fn student_with_code(code: Option<&str>, expires_at: Option<Timestamp>) -> Student {
        let now = Timestamp::now();
        Student {
            id: Uuid::new_v4(),
            first_name: "Alice".to_owned(),
            last_name: "Example".to_owned(),
            email_address: "alice@example.com".to_owned(),
            phone_number: "03001234567".to_owned(),
            student_number: None,
            photo_url: None,
            is_verified: false,
            verification_code: code.map(str::to_owned),
            code_expires_at: expires_at.map(Into::into),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[test]
    fn no_pending_code_rejects_everything() {
        let student = student_with_code(None, None);
        let now = Timestamp::now();

        assert!(!student.has_pending_code());
        assert!(!student.accepts_code("000000", now));
        assert!(!student.accepts_code("", now));
    }

    #[test]
    fn accepts_exact_match_before_expiry() {
        let now = Timestamp::now();
        let student = student_with_code(Some("483920"), Some(now + 10.minutes()));

        assert!(student.has_pending_code());
        assert!(student.accepts_code("483920", now + 5.minutes()));
    }

    #[test]
    fn rejects_wrong_code() {
        let now = Timestamp::now();
        let student = student_with_code(Some("483920"), Some(now + 10.minutes()));

        assert!(!student.accepts_code("483921", now));
        // No normalization: whitespace and sign variants are different strings.
        assert!(!student.accepts_code(" 483920", now));
        assert!(!student.accepts_code("483920 ", now));
    }

    #[test]
    fn rejects_expired_code() {
        let now = Timestamp::now();
        let student = student_with_code(Some("483920"), Some(now - 1.minutes()));

        assert!(student.code_expired(now));
        assert!(!student.accepts_code("483920", now));
    }

    #[test]
    fn expiry_boundary_is_exclusive() {
        let now = Timestamp::now();
        let student = student_with_code(Some("483920"), Some(now));

        // A code is valid only while now < expiry; at the boundary it is gone.
        assert!(student.code_expired(now));
        assert!(!student.accepts_code("483920", now));
    }

    #[test]
    fn leading_zero_codes_match_exactly() {
        let now = Timestamp::now();
        let student = student_with_code(Some("004213"), Some(now + 10.minutes()));

        assert!(student.accepts_code("004213", now));
        assert!(!student.accepts_code("4213", now));
    }

    #[test]
    fn reissue_invalidates_previous_code() {
        let now = Timestamp::now();
        let mut student = student_with_code(Some("111111"), Some(now + 10.minutes()));

        // A second issue overwrites the pair; only the newest code verifies.
        student.verification_code = Some("222222".to_owned());
        student.code_expires_at = Some((now + 10.minutes()).into());

        assert!(!student.accepts_code("111111", now));
        assert!(student.accepts_code("222222", now));
    }

    #[test]
    fn consumed_code_no_longer_verifies() {
        let now = Timestamp::now();
        let mut student = student_with_code(Some("483920"), Some(now + 10.minutes()));
        assert!(student.accepts_code("483920", now + 5.minutes()));

        // Consumption clears the pair and marks the account verified.
        student.is_verified = true;
        student.verification_code = None;
        student.code_expires_at = None;

        assert!(!student.accepts_code("483920", now + 6.minutes()));
    }

    #[test]
    fn display_name_joins_names() {
        let student = student_with_code(None, None);
        assert_eq!(student.display_name(), "Alice Example");
    }
}
