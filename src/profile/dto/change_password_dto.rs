use serde::Deserialize;
use utoipa::ToSchema;
use validator::ValidationError;
use validator_derive::Validate;

use crate::shared::validation::is_blank;

#[derive(ToSchema)]
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
  #[serde(default)]
  #[validate(custom(function = "required"))]
  pub current_password: String,
  #[serde(default)]
  pub new_password: String,
  #[serde(default)]
  #[validate(must_match(
    other = "new_password",
    message = "New password and confirm password do not match"
  ))]
  pub confirm_password: String,
}

fn required(value: &str) -> Result<(), ValidationError> {
  if is_blank(value) {
    let mut error = ValidationError::new("required");
    error.message = Some("Please enter your current password".into());
    return Err(error);
  }
  Ok(())
}
