//! Redis key-value adapter.
//!
//! `bb8-redis` pools multiplexed connections; [`RedisUserStore`] implements
//! the key-value [`UserStore`](crate::domain::ports::UserStore).

mod pool;
mod redis_user_store;

pub use pool::{RedisConfig, RedisPool, RedisPoolError};
pub use redis_user_store::RedisUserStore;
