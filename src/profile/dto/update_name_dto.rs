use serde::Deserialize;
use utoipa::ToSchema;
use validator::ValidationError;
use validator_derive::Validate;

pub const MIN_NAME_LENGTH: usize = 3;

#[derive(ToSchema)]
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateNameDto {
  #[serde(default)]
  #[validate(custom(function = "trimmed_min_length"))]
  pub name: String,
}

fn trimmed_min_length(value: &str) -> Result<(), ValidationError> {
  if value.trim().chars().count() >= MIN_NAME_LENGTH {
    return Ok(());
  }
  let mut error = ValidationError::new("length");
  error.message = Some(
    format!("Name must be at least {} characters", MIN_NAME_LENGTH).into(),
  );
  Err(error)
}
