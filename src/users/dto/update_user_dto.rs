use serde::Deserialize;
use utoipa::ToSchema;
use validator::ValidationError;
use validator_derive::Validate;

use crate::{
  shared::{role::Role, validation::is_blank},
  users::model::user::UserChanges,
};

#[derive(ToSchema)]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
  #[validate(custom(function = "not_blank"))]
  pub name: Option<String>,
  pub email: Option<String>,
  pub role: Option<Role>,
  pub is_blocked: Option<bool>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
  if is_blank(value) {
    let mut error = ValidationError::new("blank");
    error.message = Some("Name cannot be empty".into());
    return Err(error);
  }
  Ok(())
}

impl From<UpdateUserDto> for UserChanges {
  fn from(dto: UpdateUserDto) -> Self {
    Self {
      name: dto.name.map(|name| name.trim().to_string()),
      email: dto.email.map(|email| email.trim().to_lowercase()),
      role: dto.role,
      is_blocked: dto.is_blocked,
    }
  }
}
