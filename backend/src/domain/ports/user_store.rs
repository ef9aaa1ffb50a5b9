//! Port abstraction for the per-backend user stores and their errors.
//!
//! Every backend (relational, key-value, document) implements the same
//! `insert`/`update` capability set. Adapters report failures through
//! [`UserStoreError`]; only [`UserStoreError::NotFound`] carries a
//! classification that survives to the transport boundary.

use async_trait::async_trait;

use crate::domain::{RequestContext, StoreId, UserId, UserName};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user store adapters.
    pub enum UserStoreError {
        /// The record the adapter expected to read back is absent.
        NotFound { message: String } => "record not found: {message}",
        /// The backend could not be reached or a pooled client checked out.
        Connection { message: String } => "store connection failed: {message}",
        /// The backend rejected or failed a command.
        Query { message: String } => "store command failed: {message}",
        /// The request deadline elapsed before the backend answered.
        DeadlineExceeded => "store call exceeded the request deadline",
    }
}

/// Insert/update capability exposed by each backing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a record for `name` and return the store-local identifier.
    async fn insert(
        &self,
        ctx: &RequestContext,
        name: &UserName,
    ) -> Result<StoreId, UserStoreError>;

    /// Rename the record identified by `id`.
    ///
    /// Implementations do not check for existence; touching zero records is
    /// not an error.
    async fn update(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserStoreError>;
}
