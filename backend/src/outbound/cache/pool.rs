//! Pooled Redis connections via `bb8-redis`.

use std::time::Duration;

use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::RedisError;

/// Errors raised while building or using the Redis pool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedisPoolError {
    #[error("failed to build redis pool: {message}")]
    Build { message: String },

    #[error("failed to get redis connection from pool: {message}")]
    Checkout { message: String },

    #[error("redis ping failed: {message}")]
    Ping { message: String },
}

impl RedisPoolError {
    pub fn message(&self) -> &str {
        match self {
            Self::Build { message } | Self::Checkout { message } | Self::Ping { message } => {
                message
            }
        }
    }
}

impl From<RunError<RedisError>> for RedisPoolError {
    fn from(error: RunError<RedisError>) -> Self {
        let message = match error {
            RunError::User(err) => err.to_string(),
            RunError::TimedOut => "timed out waiting for a connection".to_owned(),
        };
        Self::Checkout { message }
    }
}

/// Configuration for the Redis connection pool.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl RedisConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(5),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Cloneable handle over a `bb8` pool of multiplexed Redis connections.
#[derive(Clone)]
pub struct RedisPool {
    inner: Pool<RedisConnectionManager>,
}

impl RedisPool {
    /// Build the pool and send `PING` on one connection.
    pub async fn connect(config: RedisConfig) -> Result<Self, RedisPoolError> {
        let manager = RedisConnectionManager::new(config.url.as_str()).map_err(|err| {
            RedisPoolError::Build {
                message: err.to_string(),
            }
        })?;
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| RedisPoolError::Build {
                message: err.to_string(),
            })?;
        let pool = Self { inner };
        pool.ping().await?;
        Ok(pool)
    }

    pub async fn get(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, RunError<RedisError>> {
        self.inner.get().await
    }

    async fn ping(&self) -> Result<(), RedisPoolError> {
        let mut conn = self.get().await?;
        let _pong: String = bb8_redis::redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|err| RedisPoolError::Ping {
                message: err.to_string(),
            })?;
        Ok(())
    }
}
