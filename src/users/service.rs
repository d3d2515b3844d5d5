use std::sync::Arc;

use validator::Validate;

use crate::{
  auth::dto::{login_dto::LoginDto, register_dto::RegisterDto},
  profile::dto::{
    change_password_dto::ChangePasswordDto, update_name_dto::UpdateNameDto,
  },
  shared::{
    hash_worker::Hasher,
    http_error::{field_errors, AppError},
    role::Role,
    validation::{self, password_problems},
  },
  users::{
    dto::{
      create_user_dto::CreateUserDto, update_user_dto::UpdateUserDto,
      user_query_dto::UserQueryDto,
    },
    model::user::{NewUser, User, UserChanges},
    repository::user_repository::UserRepository,
    rto::{
      dashboard_rto::DashboardRto, paginated_rto::PaginatedRto,
      user_rto::UserRto,
    },
  },
};

pub const INCORRECT_CREDENTIALS: &str = "Incorrect email or password";
pub const INVALID_ADMIN_CREDENTIALS: &str = "Invalid admin credentials";
pub const ACCOUNT_BLOCKED: &str = "Your account has been blocked by admin";
pub const EMAIL_IN_USE: &str = "Email already in use";
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";

/// Business rules over the user store. Handlers talk to this type only.
pub struct UserService<UR: UserRepository> {
  repository: UR,
  hasher: Arc<dyn Hasher>,
}

impl<UR: UserRepository> UserService<UR> {
  pub fn new(repository: UR, hasher: Arc<dyn Hasher>) -> Self {
    Self { repository, hasher }
  }

  pub async fn register_user(
    &self,
    request: RegisterDto,
  ) -> Result<UserRto, AppError> {
    self
      .create_account(request.name, request.email, request.password, Role::User)
      .await
  }

  /// Admin-side creation; same checks as a registration but the role is
  /// chosen by the caller.
  pub async fn create_user(
    &self,
    request: CreateUserDto,
  ) -> Result<UserRto, AppError> {
    self
      .create_account(request.name, request.email, request.password, request.role)
      .await
  }

  /// Unknown email and wrong password produce the same error. The blocked
  /// check runs before the password comparison.
  pub async fn login_user(&self, request: LoginDto) -> Result<UserRto, AppError> {
    validation::validate_login_input(&request.email, &request.password)?;

    let user = self
      .repository
      .find_by_email(request.email.trim())
      .await?
      .ok_or_else(|| AppError::Authentication(INCORRECT_CREDENTIALS.into()))?;

    if user.is_blocked {
      tracing::info!(user_id = %user.id, "Blocked user attempted to log in");
      return Err(AppError::Authentication(ACCOUNT_BLOCKED.into()));
    }

    self
      .check_password(&request.password, &user, INCORRECT_CREDENTIALS)
      .await?;
    Ok(user.into())
  }

  /// Login restricted to administrators. A non-admin account is rejected
  /// with the same message as a wrong password.
  pub async fn login_admin(
    &self,
    request: LoginDto,
  ) -> Result<UserRto, AppError> {
    validation::validate_login_input(&request.email, &request.password)?;

    let admin = self
      .repository
      .find_by_email(request.email.trim())
      .await?
      .filter(|user| user.role == Role::Admin)
      .ok_or_else(|| {
        AppError::Authentication(INVALID_ADMIN_CREDENTIALS.into())
      })?;

    if admin.is_blocked {
      return Err(AppError::Authentication(ACCOUNT_BLOCKED.into()));
    }

    self
      .check_password(&request.password, &admin, INVALID_ADMIN_CREDENTIALS)
      .await?;
    Ok(admin.into())
  }

  /// Re-reads the account behind a session so deletions and blocks take
  /// effect on the next request.
  pub async fn authenticate_session(&self, id: &str) -> Result<UserRto, AppError> {
    let user = self
      .repository
      .find_by_id(id)
      .await?
      .ok_or_else(|| AppError::Authentication(SESSION_EXPIRED.into()))?;
    if user.is_blocked {
      return Err(AppError::Authentication(ACCOUNT_BLOCKED.into()));
    }
    Ok(user)
  }

  pub async fn get_user_by_id(&self, id: &str) -> Result<UserRto, AppError> {
    self
      .repository
      .find_by_id(id)
      .await?
      .ok_or_else(AppError::user_not_found)
  }

  pub async fn get_all_users(
    &self,
    query: &UserQueryDto,
  ) -> Result<PaginatedRto<UserRto>, AppError> {
    Ok(self.repository.find_all(query).await?)
  }

  pub async fn update_user(
    &self,
    id: &str,
    request: UpdateUserDto,
  ) -> Result<UserRto, AppError> {
    let user = self.get_user_by_id(id).await?;
    request.validate()?;

    if let Some(email) = &request.email {
      let email = email.trim();
      validation::validate_email(email)?;
      if email.to_lowercase() != user.email
        && self.repository.email_exists(email).await?
      {
        return Err(AppError::Conflict(EMAIL_IN_USE.into()));
      }
    }

    let updated = self
      .repository
      .update(id, UserChanges::from(request))
      .await?
      .ok_or_else(AppError::user_not_found)?;
    tracing::info!(user_id = %updated.id, "Updated user");
    Ok(updated)
  }

  pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
    self.get_user_by_id(id).await?;
    if !self.repository.delete(id).await? {
      return Err(AppError::user_not_found());
    }
    tracing::info!(user_id = %id, "Deleted user");
    Ok(())
  }

  pub async fn block_user(&self, id: &str) -> Result<UserRto, AppError> {
    self.set_blocked(id, true).await
  }

  pub async fn unblock_user(&self, id: &str) -> Result<UserRto, AppError> {
    self.set_blocked(id, false).await
  }

  pub async fn update_name(
    &self,
    id: &str,
    request: UpdateNameDto,
  ) -> Result<UserRto, AppError> {
    request.validate()?;
    let changes = UserChanges {
      name: Some(request.name.trim().to_string()),
      ..Default::default()
    };
    self
      .repository
      .update(id, changes)
      .await?
      .ok_or_else(AppError::user_not_found)
  }

  /// Self-service password change. Shape problems with all three fields are
  /// reported together before the current password is checked.
  pub async fn change_password(
    &self,
    id: &str,
    request: ChangePasswordDto,
  ) -> Result<(), AppError> {
    let mut errors = match request.validate() {
      Ok(()) => Default::default(),
      Err(errors) => field_errors(&errors),
    };
    let problems = password_problems(&request.new_password);
    if !problems.is_empty() {
      errors.insert(String::from("new_password"), problems);
    }
    if !errors.is_empty() {
      return Err(AppError::validation(errors));
    }

    let user = self
      .repository
      .find_record_by_id(id)
      .await?
      .ok_or_else(AppError::user_not_found)?;

    let matches = self
      .hasher
      .verify_password(&request.current_password, &user.password_hash)
      .await?;
    if !matches {
      return Err(AppError::invalid_field(
        "Current password is incorrect",
        "current_password",
        "Current password is incorrect",
      ));
    }

    let password_hash =
      self.hasher.hash_password(&request.new_password).await?;
    if !self.repository.update_password(id, &password_hash).await? {
      return Err(AppError::user_not_found());
    }
    tracing::info!(user_id = %id, "Password changed");
    Ok(())
  }

  /// Overview of regular accounts for the admin dashboard.
  pub async fn dashboard(
    &self,
    page: Option<i64>,
    page_size: u64,
  ) -> Result<DashboardRto, AppError> {
    let query = UserQueryDto {
      page,
      limit: Some(page_size as i64),
      search: None,
      role: Some(Role::User),
    };
    let stats = self.repository.stats(Role::User).await?;
    let users = self.repository.find_all(&query).await?;
    Ok(DashboardRto { stats, users })
  }

  async fn create_account(
    &self,
    name: String,
    email: String,
    password: String,
    role: Role,
  ) -> Result<UserRto, AppError> {
    validation::validate_register_input(&name, &email, &password)?;

    let email = email.trim().to_lowercase();
    if self.repository.email_exists(&email).await? {
      return Err(AppError::Conflict(EMAIL_IN_USE.into()));
    }

    let password_hash = self.hasher.hash_password(&password).await?;
    // A concurrent registration can still win the race; the store's unique
    // index turns that into the same conflict.
    let user = self
      .repository
      .create(NewUser {
        name: name.trim().to_string(),
        email,
        password_hash,
        role,
      })
      .await?;
    Ok(user.into())
  }

  async fn check_password(
    &self,
    password: &str,
    user: &User,
    message: &str,
  ) -> Result<(), AppError> {
    let matches = self
      .hasher
      .verify_password(password, &user.password_hash)
      .await?;
    if matches {
      Ok(())
    } else {
      Err(AppError::Authentication(message.to_string()))
    }
  }

  async fn set_blocked(
    &self,
    id: &str,
    is_blocked: bool,
  ) -> Result<UserRto, AppError> {
    let user = self
      .repository
      .toggle_block_user(id, is_blocked)
      .await?
      .ok_or_else(AppError::user_not_found)?;
    tracing::info!(user_id = %user.id, is_blocked, "Changed block status");
    Ok(user)
  }
}
