use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema,
)]
pub enum Role {
  #[default]
  #[serde(rename = "user")]
  User,
  #[serde(rename = "admin")]
  Admin,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::User => "user",
      Role::Admin => "admin",
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
