//! Signup field validation.
//!
//! Validation failures are data, not errors: every submit produces one
//! [`Validation`] per field and the screen decides what to show.

use std::sync::OnceLock;

use regex::Regex;

/// Field a validation result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    Password,
    Name,
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationFailure {
    EmailEmpty,
    EmailInvalid,
    PasswordEmpty,
    NameEmpty,
}

impl ValidationFailure {
    /// Text shown next to the field.
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationFailure::EmailEmpty => "Email is required",
            ValidationFailure::EmailInvalid => "Email is not valid",
            ValidationFailure::PasswordEmpty => "Password is required",
            ValidationFailure::NameEmpty => "Name is required",
        }
    }
}

/// Per-field result. `Unknown` until the first validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldStatus {
    Success,
    Failure(ValidationFailure),
    #[default]
    Unknown,
}

impl FieldStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FieldStatus::Success)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Validation {
    pub field: Field,
    pub status: FieldStatus,
}

impl Validation {
    fn new(field: Field, status: FieldStatus) -> Self {
        Self { field, status }
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Validate raw signup inputs, one result per field.
pub fn validate_signup_fields(email: &str, password: &str, name: &str) -> Vec<Validation> {
    let email_status = if email.is_empty() {
        FieldStatus::Failure(ValidationFailure::EmailEmpty)
    } else if !email_pattern().is_match(email) {
        FieldStatus::Failure(ValidationFailure::EmailInvalid)
    } else {
        FieldStatus::Success
    };

    let password_status = if password.is_empty() {
        FieldStatus::Failure(ValidationFailure::PasswordEmpty)
    } else {
        FieldStatus::Success
    };

    let name_status = if name.trim().is_empty() {
        FieldStatus::Failure(ValidationFailure::NameEmpty)
    } else {
        FieldStatus::Success
    };

    vec![
        Validation::new(Field::Email, email_status),
        Validation::new(Field::Password, password_status),
        Validation::new(Field::Name, name_status),
    ]
}

/// First result for `field`, or `Unknown` if the field was not validated.
pub fn status_for(validations: &[Validation], field: Field) -> FieldStatus {
    validations
        .iter()
        .find(|validation| validation.field == field)
        .map(|validation| validation.status)
        .unwrap_or_default()
}

/// True when every result is `Success` (and there is at least one).
pub fn all_passed(validations: &[Validation]) -> bool {
    !validations.is_empty() && validations.iter().all(|v| v.status.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_email_fails_others_pass() {
        let results = validate_signup_fields("", "p1", "n");
        assert_eq!(
            status_for(&results, Field::Email),
            FieldStatus::Failure(ValidationFailure::EmailEmpty)
        );
        assert_eq!(status_for(&results, Field::Password), FieldStatus::Success);
        assert_eq!(status_for(&results, Field::Name), FieldStatus::Success);
        assert!(!all_passed(&results));
    }

    #[test]
    fn malformed_email_is_invalid() {
        let results = validate_signup_fields("not-an-email", "p1", "n");
        assert_eq!(
            status_for(&results, Field::Email),
            FieldStatus::Failure(ValidationFailure::EmailInvalid)
        );
    }

    #[test]
    fn all_fields_valid() {
        let results = validate_signup_fields("ada@example.com", "secret", "Ada");
        assert!(all_passed(&results));
    }

    #[test]
    fn blank_name_fails() {
        let results = validate_signup_fields("ada@example.com", "secret", "   ");
        assert_eq!(
            status_for(&results, Field::Name),
            FieldStatus::Failure(ValidationFailure::NameEmpty)
        );
    }

    #[test]
    fn missing_field_is_unknown() {
        assert_eq!(status_for(&[], Field::Email), FieldStatus::Unknown);
        assert!(!all_passed(&[]));
    }
}
