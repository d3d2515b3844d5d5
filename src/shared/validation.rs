//! Shape and format checks run before anything touches the store.
//!
//! Every check reports all the problems it finds at once, keyed by field,
//! so a form can show them together.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{http_error::AppError, rto::api_response::FieldErrors};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;
const MIN_PASSWORD_LENGTH: usize = 8;

pub const INVALID_EMAIL: &str = "Invalid email format";

pub fn validate_email(email: &str) -> Result<(), AppError> {
  if EMAIL_PATTERN.is_match(email) {
    return Ok(());
  }
  Err(AppError::invalid_field(INVALID_EMAIL, "email", INVALID_EMAIL))
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
  let problems = password_problems(password);
  if problems.is_empty() {
    return Ok(());
  }
  let mut errors = FieldErrors::new();
  errors.insert(String::from("password"), problems);
  Err(AppError::Validation {
    message: String::from("Password does not meet requirements"),
    errors,
  })
}

/// Blank fields are reported as required; filled-in email and password are
/// also checked for format and strength, and everything is merged into one
/// error.
pub fn validate_register_input(
  name: &str,
  email: &str,
  password: &str,
) -> Result<(), AppError> {
  let mut errors = FieldErrors::new();

  if is_blank(name) {
    errors.insert(String::from("name"), vec![String::from("Name is required")]);
  }

  if is_blank(email) {
    errors
      .insert(String::from("email"), vec![String::from("Email is required")]);
  } else if !EMAIL_PATTERN.is_match(email) {
    errors.insert(String::from("email"), vec![String::from(INVALID_EMAIL)]);
  }

  if is_blank(password) {
    errors.insert(
      String::from("password"),
      vec![String::from("Password is required")],
    );
  } else {
    let problems = password_problems(password);
    if !problems.is_empty() {
      errors.insert(String::from("password"), problems);
    }
  }

  finish(errors)
}

/// Only presence is checked at login; format and strength were enforced
/// when the account was created.
pub fn validate_login_input(email: &str, password: &str) -> Result<(), AppError> {
  let mut errors = FieldErrors::new();
  if is_blank(email) {
    errors
      .insert(String::from("email"), vec![String::from("Email is required")]);
  }
  if is_blank(password) {
    errors.insert(
      String::from("password"),
      vec![String::from("Password is required")],
    );
  }
  finish(errors)
}

pub fn is_blank(value: &str) -> bool {
  value.trim().is_empty()
}

pub(crate) fn password_problems(password: &str) -> Vec<String> {
  let mut problems = Vec::new();
  if password.chars().count() < MIN_PASSWORD_LENGTH {
    problems.push(format!(
      "Password must be at least {} characters",
      MIN_PASSWORD_LENGTH
    ));
  }
  if !password.chars().any(|c| c.is_ascii_uppercase()) {
    problems.push(String::from("Password must contain an uppercase letter"));
  }
  if !password.chars().any(|c| c.is_ascii_digit()) {
    problems.push(String::from("Password must contain a number"));
  }
  if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
    problems.push(String::from("Password must contain a special character"));
  }
  problems
}

fn finish(errors: FieldErrors) -> Result<(), AppError> {
  if errors.is_empty() {
    Ok(())
  } else {
    Err(AppError::validation(errors))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn errors_of(result: Result<(), AppError>) -> FieldErrors {
    match result {
      Err(AppError::Validation { errors, .. }) => errors,
      other => panic!("expected a validation error, got {:?}", other),
    }
  }

  #[test]
  fn test_validate_email() {
    assert!(validate_email("jane@example.com").is_ok());
    assert!(validate_email("jane.doe+tag@mail.example.org").is_ok());

    for email in ["", "jane", "jane@example", "@example.com", "ja ne@x.io"] {
      let errors = errors_of(validate_email(email));
      assert_eq!(errors["email"], vec![String::from(INVALID_EMAIL)]);
    }
  }

  #[test]
  fn test_validate_password_reports_every_rule() {
    let errors = errors_of(validate_password("short"));
    let problems = &errors["password"];
    assert_eq!(problems.len(), 4);
    assert!(problems.iter().any(|p| p.contains("at least 8")));
    assert!(problems.iter().any(|p| p.contains("uppercase")));
    assert!(problems.iter().any(|p| p.contains("number")));
    assert!(problems.iter().any(|p| p.contains("special")));
  }

  #[test]
  fn test_validate_password_accepts_strong_password() {
    assert!(validate_password("Sup3r$ecret").is_ok());
    let errors = errors_of(validate_password("Longenough1"));
    assert_eq!(
      errors["password"],
      vec![String::from("Password must contain a special character")]
    );
  }

  #[test]
  fn test_validate_register_input_accumulates_all_fields() {
    let errors = errors_of(validate_register_input("  ", "not-an-email", "abc"));
    assert_eq!(errors["name"], vec![String::from("Name is required")]);
    assert_eq!(errors["email"], vec![String::from(INVALID_EMAIL)]);
    assert!(errors["password"].len() >= 3);
  }

  #[test]
  fn test_validate_register_input_reports_blank_fields() {
    let errors = errors_of(validate_register_input("", "", ""));
    assert_eq!(errors.len(), 3);
    assert_eq!(errors["password"], vec![String::from("Password is required")]);
    assert!(validate_register_input("Jane", "jane@example.com", "Sup3r$ecret")
      .is_ok());
  }

  #[test]
  fn test_validate_login_input_only_checks_presence() {
    assert!(validate_login_input("not-an-email", "weak").is_ok());
    let errors = errors_of(validate_login_input(" ", ""));
    assert_eq!(errors["email"], vec![String::from("Email is required")]);
    assert_eq!(errors["password"], vec![String::from("Password is required")]);
  }
}
