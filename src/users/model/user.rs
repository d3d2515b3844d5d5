use chrono::{DateTime, Utc};

use crate::shared::role::Role;

/// A stored account, password hash included. Never serialized; responses
/// go through `UserRto`.
#[derive(Debug, Clone)]
pub struct User {
  pub id: String,
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub role: Role,
  pub is_blocked: bool,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Fields required to insert an account. The store assigns id and
/// timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name: String,
  pub email: String,
  pub password_hash: String,
  pub role: Role,
}

/// Partial update: `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
  pub name: Option<String>,
  pub email: Option<String>,
  pub role: Option<Role>,
  pub is_blocked: Option<bool>,
}

impl User {
  pub fn new(new_user: NewUser, id: String, now: DateTime<Utc>) -> Self {
    Self {
      id,
      name: new_user.name,
      email: new_user.email.to_lowercase(),
      password_hash: new_user.password_hash,
      role: new_user.role,
      is_blocked: false,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn apply(&mut self, changes: UserChanges, now: DateTime<Utc>) {
    if let Some(name) = changes.name {
      self.name = name;
    }
    if let Some(email) = changes.email {
      self.email = email.to_lowercase();
    }
    if let Some(role) = changes.role {
      self.role = role;
    }
    if let Some(is_blocked) = changes.is_blocked {
      self.is_blocked = is_blocked;
    }
    self.updated_at = now;
  }
}
