//! Administrator dashboard and user management.

use actix_web::{http::header, http::StatusCode, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::auth::dto::login_dto::LoginDto;
use crate::auth::guard::require_admin;
use crate::auth::rto::login_rto::LoginRto;
use crate::shared::http_error::AppError;
use crate::shared::rto::api_response::ApiResponse;
use crate::shared::session::expired_cookie;
use crate::users::dto::{
  create_user_dto::CreateUserDto, update_user_dto::UpdateUserDto,
  user_query_dto::UserQueryDto,
};
use crate::users::repository::user_repository::UserRepository;
use crate::users::rto::{
  dashboard_rto::DashboardRto, paginated_rto::PaginatedRto, user_rto::UserRto,
};
use crate::AppState;

#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
  /// 1-based page of the user list.
  pub page: Option<i64>,
}

#[utoipa::path(
  post,
  path = "/admin/login",
  tag = "admin",
  request_body = LoginDto,
  responses(
    (status = 200, description = "Administrator session started", body = ApiResponse<LoginRto>),
    (status = 401, description = "Invalid admin credentials"),
    (status = 429, description = "Too many attempts")
  )
)]
pub async fn admin_login<UR: UserRepository>(
  data: web::Data<AppState<UR>>,
  dto: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
  let admin = data.user_service.login_admin(dto.into_inner()).await?;
  let cookie = data.session.issue(&admin)?;
  tracing::info!(user_id = %admin.id, "Administrator logged in");

  Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
    StatusCode::OK,
    "Login successful",
    LoginRto::from(admin),
  )))
}

#[utoipa::path(
  post,
  path = "/admin/logout",
  tag = "admin",
  responses(
    (status = 200, description = "Session cookie cleared")
  )
)]
pub async fn admin_logout() -> HttpResponse {
  HttpResponse::Ok()
    .cookie(expired_cookie())
    .json(ApiResponse::message(StatusCode::OK, "Logged out"))
}

#[utoipa::path(
  get,
  path = "/admin/dashboard",
  tag = "admin",
  params(DashboardQuery),
  responses(
    (status = 200, description = "Account counts and a page of regular users", body = ApiResponse<DashboardRto>),
    (status = 401, description = "Not logged in"),
    (status = 403, description = "Not an administrator")
  )
)]
pub async fn dashboard<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  query: web::Query<DashboardQuery>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let dashboard = data
    .user_service
    .dashboard(query.page, data.config.dashboard_page_size)
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "Dashboard loaded",
    dashboard,
  )))
}

#[utoipa::path(
  get,
  path = "/admin/users",
  tag = "admin",
  params(UserQueryDto),
  responses(
    (status = 200, description = "A page of users", body = ApiResponse<PaginatedRto<UserRto>>),
    (status = 401, description = "Not logged in"),
    (status = 403, description = "Not an administrator")
  )
)]
pub async fn list_users<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  query: web::Query<UserQueryDto>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let users = data.user_service.get_all_users(&query).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "Users retrieved successfully",
    users,
  )))
}

#[utoipa::path(
  get,
  path = "/admin/users/{id}",
  tag = "admin",
  params(("id" = String, Path, description = "User id")),
  responses(
    (status = 200, description = "The user", body = ApiResponse<UserRto>),
    (status = 404, description = "Unknown id")
  )
)]
pub async fn get_user<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let user = data.user_service.get_user_by_id(&id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "User retrieved successfully",
    user,
  )))
}

#[utoipa::path(
  post,
  path = "/admin/users",
  tag = "admin",
  request_body = CreateUserDto,
  responses(
    (status = 201, description = "User created", body = ApiResponse<UserRto>),
    (status = 400, description = "Invalid input"),
    (status = 409, description = "Email already in use")
  )
)]
pub async fn create_user<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  dto: web::Json<CreateUserDto>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let user = data.user_service.create_user(dto.into_inner()).await?;
  Ok(
    HttpResponse::Created()
      .append_header((header::LOCATION, format!("/admin/users/{}", user.id)))
      .json(ApiResponse::success(
        StatusCode::CREATED,
        "User created successfully",
        user,
      )),
  )
}

#[utoipa::path(
  patch,
  path = "/admin/users/{id}",
  tag = "admin",
  params(("id" = String, Path, description = "User id")),
  request_body = UpdateUserDto,
  responses(
    (status = 200, description = "User updated", body = ApiResponse<UserRto>),
    (status = 400, description = "Invalid input"),
    (status = 404, description = "Unknown id"),
    (status = 409, description = "Email belongs to another user")
  )
)]
pub async fn update_user<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  id: web::Path<String>,
  dto: web::Json<UpdateUserDto>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let user = data
    .user_service
    .update_user(&id, dto.into_inner())
    .await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "User updated successfully",
    user,
  )))
}

#[utoipa::path(
  delete,
  path = "/admin/users/{id}",
  tag = "admin",
  params(("id" = String, Path, description = "User id")),
  responses(
    (status = 200, description = "User deleted"),
    (status = 404, description = "Unknown id")
  )
)]
pub async fn delete_user<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  data.user_service.delete_user(&id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::message(
    StatusCode::OK,
    "User deleted successfully",
  )))
}

#[utoipa::path(
  post,
  path = "/admin/users/{id}/block",
  tag = "admin",
  params(("id" = String, Path, description = "User id")),
  responses(
    (status = 200, description = "User blocked", body = ApiResponse<UserRto>),
    (status = 404, description = "Unknown id")
  )
)]
pub async fn block_user<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let user = data.user_service.block_user(&id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "User blocked successfully",
    user,
  )))
}

#[utoipa::path(
  post,
  path = "/admin/users/{id}/unblock",
  tag = "admin",
  params(("id" = String, Path, description = "User id")),
  responses(
    (status = 200, description = "User unblocked", body = ApiResponse<UserRto>),
    (status = 404, description = "Unknown id")
  )
)]
pub async fn unblock_user<UR: UserRepository>(
  request: HttpRequest,
  data: web::Data<AppState<UR>>,
  id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  require_admin(&request, &data).await?;
  let user = data.user_service.unblock_user(&id).await?;
  Ok(HttpResponse::Ok().json(ApiResponse::success(
    StatusCode::OK,
    "User unblocked successfully",
    user,
  )))
}
