//! Input normalisation shared by the services.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{ServiceError, ServiceResult};

/// Longest accepted value for names, roll numbers and emails.
pub const MAX_TEXT_LEN: usize = 255;

/// Minimum length of a password chosen at signup.
pub const MIN_PASSWORD_LEN: usize = 8;

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
    })
}

/// Trim a required text field, rejecting empty or oversized values.
pub fn required(field: &str, value: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} is required")));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(ServiceError::validation(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim and lower-case an email address, rejecting anything not shaped like `local@domain.tld`.
pub fn email(value: &str) -> ServiceResult<String> {
    let normalized = required("Email", value)?.to_lowercase();
    if !email_pattern().is_match(&normalized) {
        return Err(ServiceError::validation("Invalid email address"));
    }
    Ok(normalized)
}

pub fn new_password(value: &str) -> ServiceResult<&str> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(ServiceError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(value)
}
