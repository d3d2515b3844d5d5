use mongodb::{
  bson::doc,
  error::Error as MongoError,
  Client, Database,
};

use super::config::Config;

#[derive(Clone)]
pub struct MongoDatabase {
  client: Client,
  database_name: String,
}

impl MongoDatabase {
  /// Connects and pings the server so a bad `MONGO_URI` fails at startup
  /// instead of on the first request.
  pub async fn connect(config: &Config) -> Result<Self, MongoError> {
    let client = Client::with_uri_str(&config.mongo_uri).await?;
    client.database("admin").run_command(doc! { "ping": 1 }).await?;
    tracing::info!(database = %config.database_name, "MongoDB connected");
    Ok(Self {
      client,
      database_name: config.database_name.clone(),
    })
  }

  pub fn database(&self) -> Database {
    self.client.database(&self.database_name)
  }
}
