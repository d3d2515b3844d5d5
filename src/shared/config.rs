use std::{env, fmt::Display, str::FromStr};

const DEV_SESSION_SECRET: &str = "DEV_SESSION_SECRET";
pub const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
  pub host: String,
  pub mongo_uri: String,
  pub database_name: String,
  pub session_secret: String,
  pub session_ttl_seconds: u64,
  pub bcrypt_cost: u32,
  pub hash_threads: u32,
  pub dashboard_page_size: u64,
  pub rate_limit_per_second: u64,
  pub rate_limit_burst: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      host: String::from("0.0.0.0:3000"),
      mongo_uri: String::from("mongodb://localhost:27017"),
      database_name: String::from("user_portal"),
      session_secret: String::from(DEV_SESSION_SECRET),
      session_ttl_seconds: 24 * 60 * 60,
      bcrypt_cost: 10,
      hash_threads: 4,
      dashboard_page_size: 5,
      rate_limit_per_second: 2,
      rate_limit_burst: 5,
    }
  }
}

impl Config {
  /// Reads the configuration from the process environment. Call
  /// `dotenvy::dotenv()` first to pick up a local `.env` file.
  pub fn from_env() -> Self {
    let defaults = Self::default();

    let session_secret = env::var("SESSION_SECRET").unwrap_or_else(|_| {
      tracing::warn!(
        "SESSION_SECRET is not set, falling back to the development secret"
      );
      defaults.session_secret.clone()
    });

    Self {
      host: env::var("HOST").unwrap_or(defaults.host),
      mongo_uri: env::var("MONGO_URI").unwrap_or(defaults.mongo_uri),
      database_name: env::var("MONGO_DATABASE")
        .unwrap_or(defaults.database_name),
      session_secret,
      session_ttl_seconds: parse_var(
        "SESSION_TTL_SECONDS",
        defaults.session_ttl_seconds,
      )
      .clamp(1, MAX_SESSION_TTL_SECONDS),
      bcrypt_cost: parse_var("BCRYPT_COST", defaults.bcrypt_cost),
      hash_threads: parse_var("HASH_THREADS", defaults.hash_threads).max(1),
      dashboard_page_size: parse_var(
        "DASHBOARD_PAGE_SIZE",
        defaults.dashboard_page_size,
      )
      .max(1),
      rate_limit_per_second: parse_var(
        "RATE_LIMIT_PER_SECOND",
        defaults.rate_limit_per_second,
      )
      .max(1),
      rate_limit_burst: parse_var("RATE_LIMIT_BURST", defaults.rate_limit_burst)
        .max(1),
    }
  }
}

fn parse_var<T>(key: &str, default: T) -> T
where
  T: FromStr + Display + Copy,
{
  match env::var(key) {
    Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
      tracing::warn!(key, value = %raw, %default, "Malformed value, using default");
      default
    }),
    Err(_) => default,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_var_falls_back_on_garbage() {
    env::set_var("USER_PORTAL_TEST_COST", "not-a-number");
    assert_eq!(parse_var("USER_PORTAL_TEST_COST", 10u32), 10);

    env::set_var("USER_PORTAL_TEST_COST", " 7 ");
    assert_eq!(parse_var("USER_PORTAL_TEST_COST", 10u32), 7);

    env::remove_var("USER_PORTAL_TEST_COST");
    assert_eq!(parse_var("USER_PORTAL_TEST_COST", 10u32), 10);
  }

  #[test]
  fn test_session_ttl_is_clamped() {
    env::set_var("SESSION_TTL_SECONDS", u64::MAX.to_string());
    assert_eq!(Config::from_env().session_ttl_seconds, MAX_SESSION_TTL_SECONDS);

    env::set_var("SESSION_TTL_SECONDS", "0");
    assert_eq!(Config::from_env().session_ttl_seconds, 1);

    env::remove_var("SESSION_TTL_SECONDS");
    assert_eq!(Config::from_env().session_ttl_seconds, 24 * 60 * 60);
  }
}
