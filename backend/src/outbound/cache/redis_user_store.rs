//! Redis-backed key-value `UserStore`.
//!
//! Records are keyed by user name with the minted identifier as the value.
//! Two users sharing a name therefore share one key; the last write wins.

use std::sync::Arc;

use async_trait::async_trait;
use bb8_redis::bb8::RunError;
use bb8_redis::redis::{AsyncCommands, RedisError};
use tracing::debug;

use crate::domain::ports::{IdGenerator, UserStore, UserStoreError};
use crate::domain::{RequestContext, StoreId, UserId, UserName};

use super::pool::RedisPool;

/// Key-value [`UserStore`] over a pooled Redis connection.
#[derive(Clone)]
pub struct RedisUserStore {
    pool: RedisPool,
    ids: Arc<dyn IdGenerator>,
}

impl RedisUserStore {
    pub fn new(pool: RedisPool, ids: Arc<dyn IdGenerator>) -> Self {
        Self { pool, ids }
    }
}

fn map_checkout_error(error: RunError<RedisError>) -> UserStoreError {
    match error {
        RunError::User(err) => map_redis_error(err),
        RunError::TimedOut => {
            UserStoreError::connection("timed out waiting for a redis connection")
        }
    }
}

fn map_redis_error(error: RedisError) -> UserStoreError {
    debug!(%error, "redis command failed");
    if error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal() {
        UserStoreError::connection(error.to_string())
    } else {
        UserStoreError::query(error.to_string())
    }
}

#[async_trait]
impl UserStore for RedisUserStore {
    async fn insert(
        &self,
        _ctx: &RequestContext,
        name: &UserName,
    ) -> Result<StoreId, UserStoreError> {
        let id = self.ids.new_id();
        let mut conn = self.pool.get().await.map_err(map_checkout_error)?;
        conn.set::<_, _, ()>(name.as_str(), id.as_str())
            .await
            .map_err(map_redis_error)?;
        let stored: Option<String> = conn.get(name.as_str()).await.map_err(map_redis_error)?;
        stored
            .map(StoreId::new)
            .ok_or_else(|| UserStoreError::not_found(format!("key `{name}`")))
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_checkout_error)?;
        conn.set::<_, _, ()>(name.as_str(), id.as_str())
            .await
            .map_err(map_redis_error)
    }
}
