use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Field name to the list of problems found with it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Envelope wrapped around every JSON body this service returns.
#[derive(ToSchema)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
  pub success: bool,
  pub status_code: u16,
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub data: Option<T>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  #[schema(value_type = Option<Object>)]
  pub errors: Option<FieldErrors>,
}

impl<T> ApiResponse<T> {
  pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
    Self {
      success: true,
      status_code: status.as_u16(),
      message: message.into(),
      data: Some(data),
      errors: None,
    }
  }
}

impl ApiResponse<()> {
  pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      success: status.is_success(),
      status_code: status.as_u16(),
      message: message.into(),
      data: None,
      errors: None,
    }
  }

  pub fn failure(
    status: StatusCode,
    message: impl Into<String>,
    errors: Option<FieldErrors>,
  ) -> Self {
    Self {
      success: false,
      status_code: status.as_u16(),
      message: message.into(),
      data: None,
      errors,
    }
  }
}
