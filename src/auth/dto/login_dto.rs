use serde::Deserialize;
use utoipa::ToSchema;

#[derive(ToSchema)]
#[derive(Debug, Clone, Deserialize)]
pub struct LoginDto {
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}
