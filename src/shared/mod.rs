use actix_web::{http::StatusCode, HttpResponse, Responder};

use rto::api_response::ApiResponse;

pub mod config;
pub mod database;
pub mod hash_worker;
pub mod http_error;
pub mod role;
pub mod rto;
pub mod session;
pub mod validation;

#[utoipa::path(
  get,
  path = "/health",
  tag = "health",
  responses(
      (status = 200, description = "Check the service health")
  )
)]
pub async fn check_health() -> impl Responder {
  HttpResponse::Ok().json(ApiResponse::message(StatusCode::OK, "OK"))
}
