use serde::Deserialize;
use utoipa::ToSchema;

use crate::shared::role::Role;

/// Account created by an administrator. Checked with the same rules as a
/// self-registration.
#[derive(ToSchema)]
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserDto {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
  #[serde(default)]
  pub role: Role,
}
