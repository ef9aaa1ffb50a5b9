//! MongoDB client construction.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use super::mongo_user_store::UserDocument;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MongoConnectError {
    #[error("invalid mongodb uri: {message}")]
    Options { message: String },

    #[error("mongodb ping failed: {message}")]
    Ping { message: String },
}

/// Where the user documents live.
#[derive(Debug, Clone)]
pub struct MongoConfig {
    uri: String,
    database: String,
    collection: String,
    server_selection_timeout: Duration,
}

impl MongoConfig {
    /// Defaults to the `tristore` database and `users` collection.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database: "tristore".to_owned(),
            collection: "users".to_owned(),
            server_selection_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

/// Connect, ping the database and hand back the typed user collection.
///
/// The driver pools connections internally; the returned handle is cheap to
/// clone and safe to share across workers.
pub async fn connect_collection(
    config: &MongoConfig,
) -> Result<Collection<UserDocument>, MongoConnectError> {
    let mut options = ClientOptions::parse(config.uri.as_str())
        .await
        .map_err(|err| MongoConnectError::Options {
            message: err.to_string(),
        })?;
    options.server_selection_timeout = Some(config.server_selection_timeout);
    let client = Client::with_options(options).map_err(|err| MongoConnectError::Options {
        message: err.to_string(),
    })?;

    let database = client.database(config.database.as_str());
    database
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| MongoConnectError::Ping {
            message: err.to_string(),
        })?;

    Ok(database.collection::<UserDocument>(config.collection.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = MongoConfig::new("mongodb://localhost:27017");
        assert_eq!(config.database(), "tristore");
        assert_eq!(config.collection(), "users");
    }

    #[test]
    fn config_overrides() {
        let config = MongoConfig::new("mongodb://localhost:27017")
            .with_database("app")
            .with_collection("people");
        assert_eq!(config.database(), "app");
        assert_eq!(config.collection(), "people");
    }

    #[tokio::test]
    async fn invalid_uri_is_rejected_before_connecting() {
        let result = connect_collection(&MongoConfig::new("http://not-mongo")).await;
        assert!(matches!(result, Err(MongoConnectError::Options { .. })));
    }
}
