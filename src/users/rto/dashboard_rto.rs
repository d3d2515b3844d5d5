use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{paginated_rto::PaginatedRto, user_rto::UserRto};

/// Head counts over the accounts of one role.
#[derive(ToSchema)]
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
  pub total: u64,
  pub active: u64,
  pub blocked: u64,
}

#[derive(ToSchema)]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRto {
  pub stats: UserStats,
  pub users: PaginatedRto<UserRto>,
}
