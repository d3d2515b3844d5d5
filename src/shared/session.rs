//! Signed session cookie carrying the logged-in identity between requests.

use actix_web::{
  cookie::{time::Duration, Cookie, SameSite},
  HttpRequest,
};
use chrono::Utc;
use jsonwebtoken::{
  decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use super::{http_error::AppError, role::Role};
use crate::users::rto::user_rto::UserRto;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
  pub sub: String,
  pub name: String,
  pub email: String,
  pub role: Role,
  pub iat: u64,
  pub exp: u64,
}

#[derive(Clone)]
pub struct SessionKeys {
  encoding: EncodingKey,
  decoding: DecodingKey,
  ttl_seconds: u64,
}

impl SessionKeys {
  pub fn new(secret: &str, ttl_seconds: u64) -> Self {
    Self {
      encoding: EncodingKey::from_secret(secret.as_bytes()),
      decoding: DecodingKey::from_secret(secret.as_bytes()),
      ttl_seconds,
    }
  }

  /// Builds the cookie that logs `user` in.
  pub fn issue(&self, user: &UserRto) -> Result<Cookie<'static>, AppError> {
    let now = Utc::now().timestamp() as u64;
    let claims = SessionClaims {
      sub: user.id.clone(),
      name: user.name.clone(),
      email: user.email.clone(),
      role: user.role,
      iat: now,
      exp: now.saturating_add(self.ttl_seconds),
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|error| AppError::Internal(error.to_string()))?;

    Ok(
      Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(
          i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX),
        ))
        .finish(),
    )
  }

  /// The claims of a valid, unexpired session cookie, if the request has
  /// one.
  pub fn read(&self, request: &HttpRequest) -> Option<SessionClaims> {
    let cookie = request.cookie(SESSION_COOKIE)?;
    decode::<SessionClaims>(
      cookie.value(),
      &self.decoding,
      &Validation::new(Algorithm::HS256),
    )
    .map(|data| data.claims)
    .map_err(|error| {
      tracing::debug!(%error, "Rejected session cookie");
    })
    .ok()
  }
}

pub fn expired_cookie() -> Cookie<'static> {
  let mut cookie = Cookie::build(SESSION_COOKIE, "")
    .path("/")
    .http_only(true)
    .same_site(SameSite::Lax)
    .finish();
  cookie.make_removal();
  cookie
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::test::TestRequest;
  use chrono::Utc;

  fn user() -> UserRto {
    UserRto {
      id: String::from("42"),
      name: String::from("Jane"),
      email: String::from("jane@example.com"),
      role: Role::User,
      is_blocked: false,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn test_issued_cookie_reads_back() {
    let keys = SessionKeys::new("secret", 60);
    let cookie = keys.issue(&user()).unwrap();
    assert!(cookie.http_only().unwrap_or(false));

    let request = TestRequest::default().cookie(cookie).to_http_request();
    let claims = keys.read(&request).expect("session should be valid");
    assert_eq!(claims.sub, "42");
    assert_eq!(claims.role, Role::User);
    assert_eq!(claims.exp - claims.iat, 60);
  }

  #[test]
  fn test_cookie_signed_with_other_secret_is_ignored() {
    let cookie = SessionKeys::new("other", 60).issue(&user()).unwrap();
    let request = TestRequest::default().cookie(cookie).to_http_request();
    assert!(SessionKeys::new("secret", 60).read(&request).is_none());
  }

  #[test]
  fn test_missing_cookie_is_no_session() {
    let request = TestRequest::default().to_http_request();
    assert!(SessionKeys::new("secret", 60).read(&request).is_none());
  }
}
