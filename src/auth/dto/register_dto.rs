use serde::Deserialize;
use utoipa::ToSchema;

/// Missing fields deserialize as empty strings so they are reported by the
/// validator rather than rejected by the JSON parser.
#[derive(ToSchema)]
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterDto {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub password: String,
}
