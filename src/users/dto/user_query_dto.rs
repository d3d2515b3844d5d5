use serde::Deserialize;
use utoipa::IntoParams;

use crate::shared::role::Role;

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Listing parameters. Out-of-range values are normalized, not rejected.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQueryDto {
  /// 1-based page, floored to 1.
  pub page: Option<i64>,
  /// Page size, clamped to 1..=100. Defaults to 10.
  pub limit: Option<i64>,
  /// Case-insensitive substring of the name or email.
  pub search: Option<String>,
  pub role: Option<Role>,
}

impl UserQueryDto {
  pub fn page(&self) -> u64 {
    self.page.unwrap_or(1).max(1) as u64
  }

  pub fn limit(&self) -> u64 {
    self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as u64
  }

  /// Saturates at `i64::MAX`, the largest skip the store accepts; pages past
  /// the end come back empty.
  pub fn skip(&self) -> u64 {
    (self.page() - 1)
      .saturating_mul(self.limit())
      .min(i64::MAX as u64)
  }

  pub fn search(&self) -> Option<&str> {
    self
      .search
      .as_deref()
      .map(str::trim)
      .filter(|search| !search.is_empty())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalization() {
    let query = UserQueryDto {
      page: Some(-3),
      limit: Some(500),
      search: Some(String::from("   ")),
      role: None,
    };
    assert_eq!(query.page(), 1);
    assert_eq!(query.limit(), 100);
    assert_eq!(query.skip(), 0);
    assert_eq!(query.search(), None);

    let query = UserQueryDto {
      page: Some(3),
      limit: Some(0),
      ..Default::default()
    };
    assert_eq!(query.limit(), 1);
    assert_eq!(query.skip(), 2);

    let defaults = UserQueryDto::default();
    assert_eq!((defaults.page(), defaults.limit()), (1, 10));
  }

  #[test]
  fn test_skip_saturates_on_huge_pages() {
    let query = UserQueryDto {
      page: Some(i64::MAX),
      limit: Some(100),
      ..Default::default()
    };
    assert_eq!(query.page(), i64::MAX as u64);
    assert_eq!(query.skip(), i64::MAX as u64);
  }
}
