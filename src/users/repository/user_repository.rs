use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
  bson::{self, doc, oid::ObjectId, Document},
  error::{Error as MongoError, ErrorKind, WriteFailure},
  options::{IndexOptions, ReturnDocument},
  Collection, IndexModel,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
  shared::{database::MongoDatabase, role::Role},
  users::{
    dto::user_query_dto::UserQueryDto,
    model::user::{NewUser, User, UserChanges},
    rto::{
      dashboard_rto::UserStats, paginated_rto::PaginatedRto, user_rto::UserRto,
    },
  },
};

const USERS_COLLECTION: &str = "users";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Error)]
pub enum UserRepositoryError {
  #[error("Email '{0}' is already registered")]
  DuplicateEmail(String),

  #[error("Database error: {0}")]
  Database(#[from] MongoError),

  #[error("Other error: {0}")]
  Other(String),
}

/// Persistence contract for accounts. Emails are compared case-insensitively
/// and stored lower-cased. Ids the store cannot parse are treated as
/// unknown.
pub trait UserRepository {
  async fn find_by_email(&self, email: &str)
    -> Result<Option<User>, UserRepositoryError>;
  async fn find_by_id(&self, id: &str)
    -> Result<Option<UserRto>, UserRepositoryError>;
  /// Like `find_by_id` but keeps the password hash.
  async fn find_record_by_id(
    &self,
    id: &str,
  ) -> Result<Option<User>, UserRepositoryError>;
  async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError>;
  async fn update(
    &self,
    id: &str,
    changes: UserChanges,
  ) -> Result<Option<UserRto>, UserRepositoryError>;
  async fn update_password(
    &self,
    id: &str,
    password_hash: &str,
  ) -> Result<bool, UserRepositoryError>;
  async fn delete(&self, id: &str) -> Result<bool, UserRepositoryError>;
  async fn find_all(
    &self,
    query: &UserQueryDto,
  ) -> Result<PaginatedRto<UserRto>, UserRepositoryError>;
  async fn toggle_block_user(
    &self,
    id: &str,
    is_blocked: bool,
  ) -> Result<Option<UserRto>, UserRepositoryError>;
  async fn email_exists(&self, email: &str) -> Result<bool, UserRepositoryError>;
  async fn stats(&self, role: Role) -> Result<UserStats, UserRepositoryError>;
}

// ### MongoDB implementation ###

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
  #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
  id: Option<ObjectId>,
  name: String,
  email: String,
  password_hash: String,
  role: Role,
  is_blocked: bool,
  created_at: bson::DateTime,
  updated_at: bson::DateTime,
}

impl From<UserDocument> for User {
  fn from(document: UserDocument) -> Self {
    Self {
      id: document.id.map(|id| id.to_hex()).unwrap_or_default(),
      name: document.name,
      email: document.email,
      password_hash: document.password_hash,
      role: document.role,
      is_blocked: document.is_blocked,
      created_at: to_chrono(document.created_at),
      updated_at: to_chrono(document.updated_at),
    }
  }
}

fn to_chrono(value: bson::DateTime) -> DateTime<Utc> {
  DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or_default()
}

fn object_id(id: &str) -> Option<ObjectId> {
  ObjectId::parse_str(id).ok()
}

fn is_duplicate_key(error: &MongoError) -> bool {
  match error.kind.as_ref() {
    ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
      write_error.code == DUPLICATE_KEY
    }
    ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
    _ => false,
  }
}

fn list_filter(query: &UserQueryDto) -> Document {
  let mut filter = Document::new();
  if let Some(search) = query.search() {
    let pattern = doc! { "$regex": regex::escape(search), "$options": "i" };
    filter.insert(
      "$or",
      vec![
        doc! { "name": pattern.clone() },
        doc! { "email": pattern },
      ],
    );
  }
  if let Some(role) = query.role {
    filter.insert("role", role.as_str());
  }
  filter
}

pub struct MongoUserRepository {
  collection: Collection<UserDocument>,
}

impl MongoUserRepository {
  pub fn new(database: &MongoDatabase) -> Self {
    Self {
      collection: database.database().collection(USERS_COLLECTION),
    }
  }

  /// Unique index on `email`. Backs the service's existence check against
  /// concurrent registrations of the same address.
  pub async fn ensure_indexes(&self) -> Result<(), UserRepositoryError> {
    let index = IndexModel::builder()
      .keys(doc! { "email": 1 })
      .options(IndexOptions::builder().unique(true).build())
      .build();
    self.collection.create_index(index).await?;
    Ok(())
  }

  async fn find_one(
    &self,
    filter: Document,
  ) -> Result<Option<User>, UserRepositoryError> {
    let document = self.collection.find_one(filter).await?;
    Ok(document.map(User::from))
  }

  async fn find_and_set(
    &self,
    id: &str,
    set: Document,
    email: Option<&str>,
  ) -> Result<Option<UserRto>, UserRepositoryError> {
    let Some(id) = object_id(id) else {
      return Ok(None);
    };
    let result = self
      .collection
      .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
      .return_document(ReturnDocument::After)
      .await;

    match result {
      Ok(document) => Ok(document.map(|document| User::from(document).into())),
      Err(error) if is_duplicate_key(&error) => Err(
        UserRepositoryError::DuplicateEmail(email.unwrap_or_default().to_string()),
      ),
      Err(error) => Err(error.into()),
    }
  }
}

impl UserRepository for MongoUserRepository {
  async fn find_by_email(
    &self,
    email: &str,
  ) -> Result<Option<User>, UserRepositoryError> {
    self.find_one(doc! { "email": email.to_lowercase() }).await
  }

  async fn find_by_id(
    &self,
    id: &str,
  ) -> Result<Option<UserRto>, UserRepositoryError> {
    Ok(self.find_record_by_id(id).await?.map(UserRto::from))
  }

  async fn find_record_by_id(
    &self,
    id: &str,
  ) -> Result<Option<User>, UserRepositoryError> {
    match object_id(id) {
      Some(id) => self.find_one(doc! { "_id": id }).await,
      None => Ok(None),
    }
  }

  async fn create(&self, user: NewUser) -> Result<User, UserRepositoryError> {
    let now = bson::DateTime::now();
    let mut document = UserDocument {
      id: None,
      name: user.name,
      email: user.email.to_lowercase(),
      password_hash: user.password_hash,
      role: user.role,
      is_blocked: false,
      created_at: now,
      updated_at: now,
    };

    let result = match self.collection.insert_one(&document).await {
      Ok(result) => result,
      Err(error) if is_duplicate_key(&error) => {
        return Err(UserRepositoryError::DuplicateEmail(document.email));
      }
      Err(error) => return Err(error.into()),
    };

    document.id = result.inserted_id.as_object_id();
    if document.id.is_none() {
      return Err(UserRepositoryError::Other(String::from(
        "Inserted id is not an ObjectId",
      )));
    }
    let user = User::from(document);
    tracing::info!(user_id = %user.id, "Created user");
    Ok(user)
  }

  async fn update(
    &self,
    id: &str,
    changes: UserChanges,
  ) -> Result<Option<UserRto>, UserRepositoryError> {
    let mut set = doc! { "updatedAt": bson::DateTime::now() };
    if let Some(name) = &changes.name {
      set.insert("name", name.as_str());
    }
    let email = changes.email.as_ref().map(|email| email.to_lowercase());
    if let Some(email) = &email {
      set.insert("email", email.as_str());
    }
    if let Some(role) = changes.role {
      set.insert("role", role.as_str());
    }
    if let Some(is_blocked) = changes.is_blocked {
      set.insert("isBlocked", is_blocked);
    }
    self.find_and_set(id, set, email.as_deref()).await
  }

  async fn update_password(
    &self,
    id: &str,
    password_hash: &str,
  ) -> Result<bool, UserRepositoryError> {
    let Some(id) = object_id(id) else {
      return Ok(false);
    };
    let result = self
      .collection
      .update_one(
        doc! { "_id": id },
        doc! { "$set": {
          "passwordHash": password_hash,
          "updatedAt": bson::DateTime::now(),
        } },
      )
      .await?;
    Ok(result.matched_count > 0)
  }

  async fn delete(&self, id: &str) -> Result<bool, UserRepositoryError> {
    let Some(id) = object_id(id) else {
      return Ok(false);
    };
    let result = self.collection.delete_one(doc! { "_id": id }).await?;
    Ok(result.deleted_count > 0)
  }

  async fn find_all(
    &self,
    query: &UserQueryDto,
  ) -> Result<PaginatedRto<UserRto>, UserRepositoryError> {
    let (page, limit) = (query.page(), query.limit());
    let filter = list_filter(query);

    let total = self.collection.count_documents(filter.clone()).await?;
    let documents: Vec<UserDocument> = self
      .collection
      .find(filter)
      .sort(doc! { "createdAt": -1, "_id": -1 })
      .skip(query.skip())
      .limit(limit as i64)
      .await?
      .try_collect()
      .await?;

    let data = documents
      .into_iter()
      .map(|document| User::from(document).into())
      .collect();
    Ok(PaginatedRto::new(data, total, page, limit))
  }

  async fn toggle_block_user(
    &self,
    id: &str,
    is_blocked: bool,
  ) -> Result<Option<UserRto>, UserRepositoryError> {
    let set = doc! {
      "isBlocked": is_blocked,
      "updatedAt": bson::DateTime::now(),
    };
    self.find_and_set(id, set, None).await
  }

  async fn email_exists(&self, email: &str) -> Result<bool, UserRepositoryError> {
    let count = self
      .collection
      .count_documents(doc! { "email": email.to_lowercase() })
      .await?;
    Ok(count > 0)
  }

  async fn stats(&self, role: Role) -> Result<UserStats, UserRepositoryError> {
    let role = role.as_str();
    let total = self.collection.count_documents(doc! { "role": role }).await?;
    let blocked = self
      .collection
      .count_documents(doc! { "role": role, "isBlocked": true })
      .await?;
    Ok(UserStats {
      total,
      active: total.saturating_sub(blocked),
      blocked,
    })
  }
}
