//! Self-service pages of a logged-in regular user.

use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use dto::{change_password_dto::ChangePasswordDto, update_name_dto::UpdateNameDto};

use crate::auth::guard::require_user;
use crate::shared::http_error::AppError;
use crate::shared::rto::api_response::ApiResponse;
use crate::users::repository::user_repository::UserRepository;
use crate::users::rto::user_rto::UserRto;
use crate::AppState;

pub mod dto;

#[utoipa::path(
  get,
  path = "/home",
  tag = "profile",
  responses(
    (status = 200, description = "The logged-in user", body = ApiResponse<UserRto>),
    (status = 401, description = "Not logged in, or the account was blocked or removed"),
    (status = 403, description = "Administrator session")
  )
)]
pub async fn home<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
) -> Result<HttpResponse, AppError> {
  let user = require_user(&request, &data).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "Welcome",
    user,
  )))
}

#[utoipa::path(
  post,
  path = "/update-name",
  tag = "profile",
  request_body = UpdateNameDto,
  responses(
    (status = 200, description = "Name changed, session refreshed", body = ApiResponse<UserRto>),
    (status = 400, description = "Name shorter than three characters"),
    (status = 401, description = "Not logged in")
  )
)]
pub async fn update_name<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  dto: web::Json<UpdateNameDto>,
) -> Result<HttpResponse, AppError> {
  let user = require_user(&request, &data).await?;
  let user = data
    .user_service
    .update_name(&user.id, dto.into_inner())
    .await?;
  // The cookie carries the display name.
  let cookie = data.session.issue(&user)?;

  Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
    StatusCode::OK,
    "Name updated successfully!",
    user,
  )))
}

#[utoipa::path(
  post,
  path = "/update-password",
  tag = "profile",
  request_body = ChangePasswordDto,
  responses(
    (status = 200, description = "Password changed"),
    (status = 400, description = "Weak or mismatched new password, or wrong current password"),
    (status = 401, description = "Not logged in")
  )
)]
pub async fn update_password<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  dto: web::Json<ChangePasswordDto>,
) -> Result<HttpResponse, AppError> {
  let user = require_user(&request, &data).await?;
  data
    .user_service
    .change_password(&user.id, dto.into_inner())
    .await?;

  Ok(HttpResponse::Ok().json(ApiResponse::message(
    StatusCode::OK,
    "Password updated successfully!",
  )))
}
