mod admin;
mod auth;
mod docs;
mod profile;
mod shared;
mod users;

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{
  http::header,
  middleware::{DefaultHeaders, Logger},
  web, App, HttpServer,
};
use rayon::ThreadPoolBuilder;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use docs::ApiDoc;
use shared::{
  check_health,
  config::Config,
  database::MongoDatabase,
  hash_worker::{HashWorker, Hasher},
  http_error::AppError,
  session::SessionKeys,
};
use users::{
  repository::user_repository::{MongoUserRepository, UserRepository},
  service::UserService,
};

// This struct represents state
pub struct AppState<UR: UserRepository> {
  pub user_service: UserService<UR>,
  pub session: SessionKeys,
  pub config: Config,
}

impl<UR: UserRepository> AppState<UR> {
  pub fn new(repository: UR, hasher: Arc<dyn Hasher>, config: Config) -> Self {
    Self {
      user_service: UserService::new(repository, hasher),
      session: SessionKeys::new(
        &config.session_secret,
        config.session_ttl_seconds,
      ),
      config,
    }
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  dotenvy::dotenv().ok();
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let config = Config::from_env();

  let database = MongoDatabase::connect(&config)
    .await
    .map_err(std::io::Error::other)?;
  let repository = MongoUserRepository::new(&database);
  repository
    .ensure_indexes()
    .await
    .map_err(std::io::Error::other)?;

  let thread_pool = ThreadPoolBuilder::new()
    .num_threads(config.hash_threads as usize)
    .build()
    .map_err(std::io::Error::other)?;
  let hasher: Arc<dyn Hasher> = Arc::new(HashWorker::new(
    thread_pool,
    config.hash_threads,
    config.bcrypt_cost,
  ));

  let server_address = config.host.clone();
  let state = web::Data::new(AppState::new(repository, hasher, config));

  tracing::info!("Listening on http://{}", server_address);
  HttpServer::new(move || {
    App::new()
      .wrap(no_cache_headers())
      .wrap(Logger::default())
      .app_data(state.clone())
      .configure(routes::<MongoUserRepository>(&state.config))
  })
  .bind(server_address)?
  .run()
  .await
}

fn no_cache_headers() -> DefaultHeaders {
  DefaultHeaders::new()
    .add((
      header::CACHE_CONTROL,
      "no-store, no-cache, must-revalidate, proxy-revalidate",
    ))
    .add((header::PRAGMA, "no-cache"))
    .add((header::EXPIRES, "0"))
}

// Function to initialize the App
fn routes<UR: UserRepository + 'static>(
  config: &Config,
) -> impl FnOnce(&mut web::ServiceConfig) {
  // Rate limit on the credential endpoints, per peer IP address.
  let governor_config = GovernorConfigBuilder::default()
    .requests_per_second(config.rate_limit_per_second)
    .burst_size(config.rate_limit_burst)
    .finish()
    .expect("rate limit values are clamped to at least one");

  move |service_config: &mut web::ServiceConfig| {
    service_config
      .app_data(web::JsonConfig::default().error_handler(|error, _| {
        AppError::invalid_field("Malformed request body", "body", error.to_string())
          .into()
      }))
      .app_data(web::QueryConfig::default().error_handler(|error, _| {
        AppError::invalid_field("Malformed query string", "query", error.to_string())
          .into()
      }))
      .route("/health", web::get().to(check_health))
      .service(Scalar::with_url("/docs", ApiDoc::openapi()))
      .service(
        web::resource("/register")
          .wrap(Governor::new(&governor_config))
          .route(web::post().to(auth::register::<UR>)),
      )
      .service(
        web::resource("/login")
          .wrap(Governor::new(&governor_config))
          .route(web::post().to(auth::login::<UR>)),
      )
      .route("/logout", web::post().to(auth::logout))
      .route("/home", web::get().to(profile::home::<UR>))
      .route("/update-name", web::post().to(profile::update_name::<UR>))
      .route(
        "/update-password",
        web::post().to(profile::update_password::<UR>),
      )
      .service(
        web::scope("/admin")
          .service(
            web::resource("/login")
              .wrap(Governor::new(&governor_config))
              .route(web::post().to(admin::admin_login::<UR>)),
          )
          .route("/logout", web::post().to(admin::admin_logout))
          .route("/dashboard", web::get().to(admin::dashboard::<UR>))
          .service(
            web::resource("/users")
              .route(web::get().to(admin::list_users::<UR>))
              .route(web::post().to(admin::create_user::<UR>)),
          )
          .service(
            web::resource("/users/{id}")
              .route(web::get().to(admin::get_user::<UR>))
              .route(web::patch().to(admin::update_user::<UR>))
              .route(web::delete().to(admin::delete_user::<UR>)),
          )
          .route("/users/{id}/block", web::post().to(admin::block_user::<UR>))
          .route(
            "/users/{id}/unblock",
            web::post().to(admin::unblock_user::<UR>),
          ),
      );
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::ServiceResponse,
    http::StatusCode,
    test, App,
  };
  use serde_json::{json, Value};
  use std::{net::SocketAddr, str::FromStr};

  use crate::{
    shared::{
      hash_worker::tests::test_hash_worker,
      role::Role,
      session::SESSION_COOKIE,
    },
    users::{
      dto::create_user_dto::CreateUserDto,
      repository::user_repository::tests::InMemoryUserRepository,
    },
  };

  const PASSWORD: &str = "Sup3r$ecret";

  fn test_config() -> Config {
    Config {
      rate_limit_per_second: 1000,
      rate_limit_burst: 1000,
      ..Config::default()
    }
  }

  fn peer() -> SocketAddr {
    SocketAddr::from_str("127.0.0.1:12345").unwrap()
  }

  fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
      .response()
      .cookies()
      .find(|cookie| cookie.name() == SESSION_COOKIE)
      .map(|cookie| cookie.into_owned())
      .expect("response should set the session cookie")
  }

  async fn body_json<B: MessageBody>(response: ServiceResponse<B>) -> Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).unwrap()
  }

  async fn seed_admin(state: &web::Data<AppState<InMemoryUserRepository>>) {
    state
      .user_service
      .create_user(CreateUserDto {
        name: String::from("Root"),
        email: String::from("root@example.com"),
        password: PASSWORD.to_string(),
        role: Role::Admin,
      })
      .await
      .unwrap();
  }

  fn state() -> web::Data<AppState<InMemoryUserRepository>> {
    web::Data::new(AppState::new(
      InMemoryUserRepository::new(),
      Arc::new(test_hash_worker()),
      test_config(),
    ))
  }

  macro_rules! app {
    ($state:expr) => {
      test::init_service(
        App::new()
          .wrap(no_cache_headers())
          .app_data($state.clone())
          .configure(routes::<InMemoryUserRepository>(&$state.config)),
      )
      .await
    };
  }

  fn post(uri: &str, body: Value) -> test::TestRequest {
    test::TestRequest::post()
      .uri(uri)
      .peer_addr(peer())
      .set_json(body)
  }

  #[actix_rt::test]
  async fn test_register_login_and_home() {
    let state = state();
    let app = app!(state);

    let response = test::call_service(
      &app,
      post(
        "/register",
        json!({ "name": "Jane", "email": "Jane@Example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
      response.headers().get(header::CACHE_CONTROL).unwrap(),
      "no-store, no-cache, must-revalidate, proxy-revalidate"
    );
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], "jane@example.com");
    assert!(body["data"]["user"].get("passwordHash").is_none());

    let response = test::call_service(
      &app,
      post("/login", json!({ "email": "jane@example.com", "password": PASSWORD }))
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let body = body_json(response).await;
    assert_eq!(body["data"]["redirect"], "/home");

    let request = test::TestRequest::get()
      .uri("/home")
      .peer_addr(peer())
      .cookie(cookie)
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["name"], "Jane");
  }

  #[actix_rt::test]
  async fn test_register_validation_errors_are_listed_per_field() {
    let state = state();
    let app = app!(state);

    let response = test::call_service(
      &app,
      post("/register", json!({ "email": "nope", "password": "short" }))
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["errors"]["name"][0], "Name is required");
    assert_eq!(body["errors"]["email"][0], "Invalid email format");
    assert!(body["errors"]["password"].as_array().unwrap().len() >= 3);
  }

  #[actix_rt::test]
  async fn test_home_requires_session() {
    let state = state();
    let app = app!(state);

    let request = test::TestRequest::get().uri("/home").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
  }

  #[actix_rt::test]
  async fn test_blocked_user_loses_session_and_login() {
    let state = state();
    let app = app!(state);
    seed_admin(&state).await;

    let response = test::call_service(
      &app,
      post(
        "/register",
        json!({ "name": "Jane", "email": "jane@example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    let user_cookie = session_cookie(&response);
    let user_id = body_json(response).await["data"]["user"]["id"]
      .as_str()
      .unwrap()
      .to_string();

    let response = test::call_service(
      &app,
      post(
        "/admin/login",
        json!({ "email": "root@example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let admin_cookie = session_cookie(&response);

    let request = test::TestRequest::post()
      .uri(&format!("/admin/users/{}/block", user_id))
      .cookie(admin_cookie.clone())
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["isBlocked"], true);

    let request = test::TestRequest::get()
      .uri("/home")
      .cookie(user_cookie)
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Your account has been blocked by admin");

    let response = test::call_service(
      &app,
      post("/login", json!({ "email": "jane@example.com", "password": PASSWORD }))
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let request = test::TestRequest::post()
      .uri(&format!("/admin/users/{}/unblock", user_id))
      .cookie(admin_cookie)
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["isBlocked"], false);
  }

  #[actix_rt::test]
  async fn test_admin_routes_reject_regular_users() {
    let state = state();
    let app = app!(state);

    let response = test::call_service(
      &app,
      post(
        "/register",
        json!({ "name": "Jane", "email": "jane@example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    let user_cookie = session_cookie(&response);

    let request = test::TestRequest::get()
      .uri("/admin/dashboard")
      .cookie(user_cookie)
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = test::call_service(
      &app,
      post(
        "/admin/login",
        json!({ "email": "jane@example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Invalid admin credentials");
  }

  #[actix_rt::test]
  async fn test_admin_manages_users() {
    let state = state();
    let app = app!(state);
    seed_admin(&state).await;

    let response = test::call_service(
      &app,
      post(
        "/admin/login",
        json!({ "email": "root@example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    let admin_cookie = session_cookie(&response);

    for i in 0..6 {
      let request = post(
        "/admin/users",
        json!({
          "name": format!("User {i}"),
          "email": format!("user{i}@example.com"),
          "password": PASSWORD,
        }),
      )
      .cookie(admin_cookie.clone())
      .to_request();
      let response = test::call_service(&app, request).await;
      assert_eq!(response.status(), StatusCode::CREATED);
      assert!(response.headers().contains_key(header::LOCATION));
    }

    let request = test::TestRequest::get()
      .uri("/admin/users?page=1&limit=4&role=user")
      .cookie(admin_cookie.clone())
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["total"], 6);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["hasNextPage"], true);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 4);
    let id = body["data"]["data"][0]["id"].as_str().unwrap().to_string();

    let request = test::TestRequest::patch()
      .uri(&format!("/admin/users/{}", id))
      .cookie(admin_cookie.clone())
      .set_json(json!({ "email": "user1@example.com" }))
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let request = test::TestRequest::get()
      .uri("/admin/dashboard?page=2")
      .cookie(admin_cookie.clone())
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(body["data"]["stats"]["total"], 6);
    assert_eq!(body["data"]["users"]["data"].as_array().unwrap().len(), 1);

    let request = test::TestRequest::delete()
      .uri(&format!("/admin/users/{}", id))
      .cookie(admin_cookie.clone())
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let request = test::TestRequest::get()
      .uri(&format!("/admin/users/{}", id))
      .cookie(admin_cookie)
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
  }

  #[actix_rt::test]
  async fn test_profile_updates() {
    let state = state();
    let app = app!(state);

    let response = test::call_service(
      &app,
      post(
        "/register",
        json!({ "name": "Jane", "email": "jane@example.com", "password": PASSWORD }),
      )
      .to_request(),
    )
    .await;
    let cookie = session_cookie(&response);

    let request = post("/update-name", json!({ "name": "Janet" }))
      .cookie(cookie.clone())
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    let claims = state
      .session
      .read(&test::TestRequest::default().cookie(cookie.clone()).to_http_request())
      .unwrap();
    assert_eq!(claims.name, "Janet");

    let request = post(
      "/update-password",
      json!({
        "currentPassword": "Wr0ng$pass",
        "newPassword": "N3w$ecret",
        "confirmPassword": "N3w$ecret",
      }),
    )
    .cookie(cookie.clone())
    .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let request = post(
      "/update-password",
      json!({
        "currentPassword": PASSWORD,
        "newPassword": "N3w$ecret",
        "confirmPassword": "N3w$ecret",
      }),
    )
    .cookie(cookie)
    .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = test::call_service(
      &app,
      post("/login", json!({ "email": "jane@example.com", "password": "N3w$ecret" }))
        .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
  }

  #[actix_rt::test]
  async fn test_logout_clears_cookie() {
    let state = state();
    let app = app!(state);

    let request = test::TestRequest::post().uri("/logout").to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(session_cookie(&response).value(), "");
  }

  #[actix_rt::test]
  async fn test_malformed_json_is_a_validation_error() {
    let state = state();
    let app = app!(state);

    let request = test::TestRequest::post()
      .uri("/login")
      .peer_addr(peer())
      .insert_header((header::CONTENT_TYPE, "application/json"))
      .set_payload("{not json")
      .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
  }
}
