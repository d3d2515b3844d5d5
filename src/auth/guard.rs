use actix_web::HttpRequest;

use crate::{
  shared::{http_error::AppError, role::Role},
  users::{repository::user_repository::UserRepository, rto::user_rto::UserRto},
  AppState,
};

/// The logged-in regular user behind this request, re-read from the store.
pub async fn require_user<UR: UserRepository>(
  request: &HttpRequest,
  data: &AppState<UR>,
) -> Result<UserRto, AppError> {
  let claims = data.session.read(request).ok_or_else(|| {
    AppError::Authentication(String::from("Please log in to continue"))
  })?;
  if claims.role == Role::Admin {
    return Err(AppError::Authorization(String::from(
      "Administrators use the admin dashboard",
    )));
  }
  data.user_service.authenticate_session(&claims.sub).await
}

/// The logged-in administrator behind this request. The role is checked
/// against the store as well as the cookie, so a demoted admin loses access
/// immediately.
pub async fn require_admin<UR: UserRepository>(
  request: &HttpRequest,
  data: &AppState<UR>,
) -> Result<UserRto, AppError> {
  let claims = data.session.read(request).ok_or_else(|| {
    AppError::Authentication(String::from("Please log in as an administrator"))
  })?;
  if claims.role != Role::Admin {
    return Err(admin_required());
  }
  let admin = data.user_service.authenticate_session(&claims.sub).await?;
  if admin.role != Role::Admin {
    return Err(admin_required());
  }
  Ok(admin)
}

fn admin_required() -> AppError {
  AppError::Authorization(String::from("Admin access required"))
}
