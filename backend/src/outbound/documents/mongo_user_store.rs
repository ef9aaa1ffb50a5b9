//! MongoDB-backed document `UserStore`.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::Collection;
use mongodb::bson::{Bson, DateTime, doc};
use mongodb::error::{Error as MongoError, ErrorKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{IdGenerator, UserStore, UserStoreError};
use crate::domain::{RequestContext, StoreId, UserId, UserName};

/// Stored shape of a user document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub created_at: DateTime,
}

/// Document [`UserStore`] over a typed MongoDB collection.
#[derive(Clone)]
pub struct MongoUserStore {
    collection: Collection<UserDocument>,
    ids: Arc<dyn IdGenerator>,
}

impl MongoUserStore {
    pub fn new(collection: Collection<UserDocument>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { collection, ids }
    }
}

/// Render the driver-reported `_id` as a plain string.
fn inserted_id_to_string(id: Bson) -> String {
    match id {
        Bson::String(value) => value,
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

fn map_mongo_error(error: MongoError) -> UserStoreError {
    debug!(%error, "mongodb operation failed");
    match error.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            UserStoreError::connection(error.to_string())
        }
        _ => UserStoreError::query(error.to_string()),
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn insert(
        &self,
        _ctx: &RequestContext,
        name: &UserName,
    ) -> Result<StoreId, UserStoreError> {
        let document = UserDocument {
            id: self.ids.new_id().as_str().to_owned(),
            name: name.as_str().to_owned(),
            created_at: DateTime::now(),
        };
        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(map_mongo_error)?;
        Ok(StoreId::new(inserted_id_to_string(result.inserted_id)))
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserStoreError> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.as_str() },
                doc! { "$set": { "name": name.as_str() } },
            )
            .await
            .map_err(map_mongo_error)?;
        debug!(
            user_id = id.as_str(),
            matched = result.matched_count,
            "document rename applied"
        );
        Ok(())
    }
}
