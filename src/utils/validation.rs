use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ValidationError;
use crate::model::employee::EmployeeDraft;

/// local part, one `@`, and a domain with at least one dot
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("valid email regex"));

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::EmptyField(field))
    } else {
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require_non_empty("email", email)?;
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ValidationError::MalformedEmail(email.to_string()))
    }
}

/// Checks run on the employee form before anything is sent.
pub fn validate_draft(draft: &EmployeeDraft) -> Result<(), ValidationError> {
    require_non_empty("first name", &draft.first_name)?;
    require_non_empty("last name", &draft.last_name)?;
    validate_email(&draft.email)
}

/// Login and register both need a username and a password.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationError> {
    require_non_empty("username", username)?;
    if password.is_empty() {
        return Err(ValidationError::EmptyField("password"));
    }
    Ok(())
}
