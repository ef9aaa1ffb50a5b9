//! MongoDB document adapter.

mod client;
mod mongo_user_store;

pub use client::{MongoConfig, MongoConnectError, connect_collection};
pub use mongo_user_store::{MongoUserStore, UserDocument};
