use utoipa::OpenApi;

use crate::{admin, auth, profile, shared};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "user-portal",
    description = "Session-authenticated user accounts with an admin dashboard"
  ),
  paths(
    shared::check_health,
    auth::register,
    auth::login,
    auth::logout,
    profile::home,
    profile::update_name,
    profile::update_password,
    admin::admin_login,
    admin::admin_logout,
    admin::dashboard,
    admin::list_users,
    admin::get_user,
    admin::create_user,
    admin::update_user,
    admin::delete_user,
    admin::block_user,
    admin::unblock_user,
  ),
  tags(
    (name = "auth", description = "Registration and login"),
    (name = "profile", description = "Self-service for logged-in users"),
    (name = "admin", description = "Administrator dashboard and user management")
  )
)]
pub struct ApiDoc;
