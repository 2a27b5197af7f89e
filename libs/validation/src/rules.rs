use once_cell::sync::Lazy;
use regex::Regex;

use crate::{limits, Violation};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Reject values containing any whitespace character.
///
/// Used for the login email, where the whole credential must be one
/// contiguous token.
pub fn no_whitespace(value: &str) -> Result<(), Violation> {
    if value.chars().any(char::is_whitespace) {
        return Err(Violation::Whitespace);
    }
    Ok(())
}

/// Reject values that trim down to nothing.
pub fn not_only_whitespace(value: &str) -> Result<(), Violation> {
    if value.trim().is_empty() {
        return Err(Violation::OnlyWhitespace);
    }
    Ok(())
}

/// `local@domain.tld` with the local part limited to alphanumerics and
/// `._%+-`, the domain to alphanumerics/hyphen/dot, and a final label of at
/// least two letters.
pub fn strict_email(value: &str) -> Result<(), Violation> {
    if !EMAIL_RE.is_match(value) {
        return Err(Violation::InvalidEmail);
    }
    Ok(())
}

/// Bounds over the trimmed length of the value.
pub fn length_between(value: &str, min: usize, max: usize) -> Result<(), Violation> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(Violation::TooShort { min, len });
    }
    if len > max {
        return Err(Violation::TooLong { max, len });
    }
    Ok(())
}

fn required(value: &str) -> Result<(), Violation> {
    if value.is_empty() {
        return Err(Violation::Required);
    }
    Ok(())
}

/// Full rule chain for the login email field.
pub fn validate_login_email(value: &str) -> Result<(), Violation> {
    required(value)?;
    no_whitespace(value)?;
    length_between(value, limits::EMAIL_MIN_LENGTH, limits::EMAIL_MAX_LENGTH)?;
    strict_email(value)
}

/// Full rule chain for a task title.
pub fn validate_task_title(value: &str) -> Result<(), Violation> {
    required(value)?;
    not_only_whitespace(value)?;
    length_between(value, limits::TITLE_MIN_LENGTH, limits::TITLE_MAX_LENGTH)
}

/// Full rule chain for a task description.
pub fn validate_task_description(value: &str) -> Result<(), Violation> {
    required(value)?;
    not_only_whitespace(value)?;
    length_between(
        value,
        limits::DESCRIPTION_MIN_LENGTH,
        limits::DESCRIPTION_MAX_LENGTH,
    )
}
