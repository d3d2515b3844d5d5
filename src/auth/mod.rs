use actix_web::{http::StatusCode, web, HttpResponse};
use dto::{login_dto::LoginDto, register_dto::RegisterDto};
use rto::login_rto::LoginRto;

use crate::shared::http_error::AppError;
use crate::shared::rto::api_response::ApiResponse;
use crate::shared::session::expired_cookie;
use crate::users::repository::user_repository::UserRepository;
use crate::AppState;

pub mod dto;
pub mod guard;
pub mod rto;

#[utoipa::path(
  post,
  path = "/register",
  tag = "auth",
  request_body = RegisterDto,
  responses(
    (status = 201, description = "Account created and session started", body = ApiResponse<LoginRto>),
    (status = 400, description = "Invalid input, every problem listed per field"),
    (status = 409, description = "Email already in use"),
    (status = 429, description = "Too many attempts")
  )
)]
pub async fn register<UR: UserRepository>(
  data: web::Data<AppState<UR>>,
  dto: web::Json<RegisterDto>,
) -> Result<HttpResponse, AppError> {
  let user = data.user_service.register_user(dto.into_inner()).await?;
  let cookie = data.session.issue(&user)?;
  tracing::info!(user_id = %user.id, "User registered");

  Ok(HttpResponse::Created().cookie(cookie).json(ApiResponse::success(
    StatusCode::CREATED,
    "Registration successful! Welcome",
    LoginRto::from(user),
  )))
}

#[utoipa::path(
  post,
  path = "/login",
  tag = "auth",
  request_body = LoginDto,
  responses(
    (status = 200, description = "Session started", body = ApiResponse<LoginRto>),
    (status = 400, description = "Missing email or password"),
    (status = 401, description = "Incorrect credentials or blocked account"),
    (status = 429, description = "Too many attempts")
  )
)]
pub async fn login<UR: UserRepository>(
  data: web::Data<AppState<UR>>,
  dto: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
  let user = data.user_service.login_user(dto.into_inner()).await?;
  let cookie = data.session.issue(&user)?;
  tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

  Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
    StatusCode::OK,
    "Login successful",
    LoginRto::from(user),
  )))
}

#[utoipa::path(
  post,
  path = "/logout",
  tag = "auth",
  responses(
    (status = 200, description = "Session cookie cleared")
  )
)]
pub async fn logout() -> HttpResponse {
  HttpResponse::Ok()
    .cookie(expired_cookie())
    .json(ApiResponse::message(StatusCode::OK, "Logged out"))
}
