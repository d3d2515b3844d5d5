use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedRto<T> {
  pub data: Vec<T>,
  pub total: u64,
  pub page: u64,
  pub limit: u64,
  pub total_pages: u64,
  pub has_next_page: bool,
  pub has_prev_page: bool,
}

impl<T> PaginatedRto<T> {
  /// `page` and `limit` must already be normalized (both at least 1).
  pub fn new(data: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
    let total_pages = total.div_ceil(limit);
    Self {
      data,
      total,
      page,
      limit,
      total_pages,
      has_next_page: page < total_pages,
      has_prev_page: page > 1,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_page_arithmetic() {
    let first = PaginatedRto::new(vec![(); 10], 25, 1, 10);
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next_page);
    assert!(!first.has_prev_page);

    let last = PaginatedRto::new(vec![(); 5], 25, 3, 10);
    assert!(!last.has_next_page);
    assert!(last.has_prev_page);

    let empty = PaginatedRto::<()>::new(Vec::new(), 0, 1, 10);
    assert_eq!(empty.total_pages, 0);
    assert!(!empty.has_next_page);
  }
}
