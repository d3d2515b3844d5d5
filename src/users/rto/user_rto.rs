use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{shared::role::Role, users::model::user::User};

/// A user as the outside world sees it: no password hash.
#[derive(ToSchema)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRto {
  pub id: String,
  pub name: String,
  pub email: String,
  pub role: Role,
  pub is_blocked: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl From<User> for UserRto {
  fn from(user: User) -> Self {
    Self {
      id: user.id,
      name: user.name,
      email: user.email,
      role: user.role,
      is_blocked: user.is_blocked,
      created_at: user.created_at,
      updated_at: user.updated_at,
    }
  }
}
