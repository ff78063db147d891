use chrono::NaiveDate;

use super::ServiceError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const MIN_AGE: i32 = 8;

/// Collects every violated rule so the client sees them all at once
#[derive(Debug, Default)]
pub struct Violations(Vec<String>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, outcome: Result<(), String>) {
        if let Err(msg) = outcome {
            self.0.push(msg);
        }
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self.0))
        }
    }
}

pub fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

/// Validate username format: 3 to 50 characters of letters, digits, `_` or `-`.
pub fn validate_username_format(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("username is required".to_string());
    }

    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(format!(
            "username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        ));
    }

    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err("username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    Ok(())
}

/// Validate email format
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("email is required".to_string());
    }

    let invalid = || Err("email must be a valid email address".to_string());

    if email.chars().any(char::is_whitespace) {
        return invalid();
    }

    let Some((local, domain)) = email.split_once('@') else {
        return invalid();
    };
    if local.is_empty() || domain.contains('@') {
        return invalid();
    }

    // Domain needs at least one dot with non-empty labels on both sides
    if domain.split('.').count() < 2 || domain.split('.').any(str::is_empty) {
        return invalid();
    }

    Ok(())
}

/// Blank passwords count as missing, as they do at login. Otherwise the
/// password is taken as typed.
pub fn validate_password(password: &str) -> Result<(), String> {
    require("password", password)?;
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(format!("password must be at least {} characters", PASSWORD_MIN_LEN));
    }
    Ok(())
}

/// Parse an optional `YYYY-MM-DD` date of birth
pub fn parse_dob(dob: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match dob.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| "dob must be a date in YYYY-MM-DD format".to_string()),
    }
}

pub fn validate_age(age: Option<i32>) -> Result<(), String> {
    match age {
        Some(age) if age < MIN_AGE => Err(format!("age must be at least {}", MIN_AGE)),
        _ => Ok(()),
    }
}
