use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{shared::role::Role, users::rto::user_rto::UserRto};

pub const USER_HOME: &str = "/home";
pub const ADMIN_HOME: &str = "/admin/dashboard";

#[derive(ToSchema)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRto {
  pub user: UserRto,
  /// Where the client should go next.
  pub redirect: String,
}

impl From<UserRto> for LoginRto {
  fn from(user: UserRto) -> Self {
    let redirect = match user.role {
      Role::Admin => ADMIN_HOME,
      Role::User => USER_HOME,
    };
    Self {
      user,
      redirect: redirect.to_string(),
    }
  }
}
