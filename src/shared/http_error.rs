use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use validator::ValidationErrors;

use super::{
  hash_worker::HashWorkerError,
  rto::api_response::{ApiResponse, FieldErrors},
  session,
};
use crate::users::repository::user_repository::UserRepositoryError;

/// Every failure a request can end with. Each variant maps to exactly one
/// HTTP status.
#[derive(Debug, Error)]
pub enum AppError {
  #[error("{message}")]
  Validation {
    message: String,
    errors: FieldErrors,
  },

  #[error("{0}")]
  Authentication(String),

  #[error("{0}")]
  Authorization(String),

  #[error("{0} not found")]
  NotFound(String),

  #[error("{0}")]
  Conflict(String),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn validation(errors: FieldErrors) -> Self {
    Self::Validation {
      message: String::from("Validation failed"),
      errors,
    }
  }

  /// A validation failure about a single field.
  pub fn invalid_field(
    message: impl Into<String>,
    field: &str,
    problem: impl Into<String>,
  ) -> Self {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), vec![problem.into()]);
    Self::Validation {
      message: message.into(),
      errors,
    }
  }

  pub fn user_not_found() -> Self {
    Self::NotFound(String::from("User"))
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation { .. } => StatusCode::BAD_REQUEST,
      AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
      AppError::Authorization(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let body = match self {
      AppError::Validation { message, errors } => {
        ApiResponse::failure(status, message.as_str(), Some(errors.clone()))
      }
      AppError::Internal(detail) => {
        tracing::error!(%detail, "Request failed");
        ApiResponse::failure(status, "Internal server error", None)
      }
      other => ApiResponse::failure(status, other.to_string(), None),
    };

    let mut response = HttpResponse::build(status);
    // A rejected identity must not survive on the client.
    if let AppError::Authentication(_) = self {
      response.cookie(session::expired_cookie());
    }
    response.json(body)
  }
}

impl From<UserRepositoryError> for AppError {
  fn from(error: UserRepositoryError) -> Self {
    match error {
      UserRepositoryError::DuplicateEmail(_) => {
        AppError::Conflict(String::from("Email already in use"))
      }
      other => AppError::Internal(other.to_string()),
    }
  }
}

impl From<HashWorkerError> for AppError {
  fn from(error: HashWorkerError) -> Self {
    AppError::Internal(error.to_string())
  }
}

impl From<ValidationErrors> for AppError {
  fn from(errors: ValidationErrors) -> Self {
    AppError::validation(field_errors(&errors))
  }
}

/// Flattens `validator` output into the field map carried by
/// [`AppError::Validation`].
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
  let mut fields = FieldErrors::new();
  for (field, problems) in errors.field_errors() {
    let messages = problems.iter().map(|problem| {
      problem
        .message
        .as_ref()
        .map(|message| message.to_string())
        .unwrap_or_else(|| problem.code.to_string())
    });
    fields.entry(field.to_string()).or_default().extend(messages);
  }
  fields
}
