//! Driving port for the user use-cases and the error it reports.
//!
//! The orchestration service and every decorator wrapping it implement
//! [`UserService`], so inbound adapters never know how many layers sit
//! between them and the stores.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{RequestContext, UserId, UserName};

use super::UserStoreError;

/// Backing store touched by a step of the orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Sql,
    Kv,
    Docs,
}

impl StoreKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Kv => "kv",
            Self::Docs => "docs",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service method, used as a log field and metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserOperation {
    CreateUser,
    UpdateUser,
}

impl UserOperation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateUser => "CreateUser",
            Self::UpdateUser => "UpdateUser",
        }
    }
}

impl fmt::Display for UserOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of one orchestration step.
///
/// Carries the store error unchanged plus the step that produced it; the
/// transport adapter decides how to classify it.
///
/// # Examples
/// ```
/// use tristore::domain::ports::{StoreKind, UserOperation, UserServiceError, UserStoreError};
///
/// let err = UserServiceError::new(
///     UserOperation::CreateUser,
///     StoreKind::Kv,
///     UserStoreError::query("READONLY"),
/// );
/// assert_eq!(
///     err.to_string(),
///     "setting user in kv store: store command failed: READONLY"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserServiceError {
    operation: UserOperation,
    store: StoreKind,
    source: UserStoreError,
}

impl UserServiceError {
    pub fn new(operation: UserOperation, store: StoreKind, source: UserStoreError) -> Self {
        Self {
            operation,
            store,
            source,
        }
    }

    pub fn operation(&self) -> UserOperation {
        self.operation
    }

    /// Store whose step failed; later stores were never called.
    pub fn store(&self) -> StoreKind {
        self.store
    }

    pub fn store_error(&self) -> &UserStoreError {
        &self.source
    }

    fn action(&self) -> &'static str {
        match (self.operation, self.store) {
            (UserOperation::CreateUser, StoreKind::Kv) => "setting",
            (UserOperation::CreateUser, _) => "inserting",
            (UserOperation::UpdateUser, _) => "updating",
        }
    }
}

impl fmt::Display for UserServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} user in {} store: {}",
            self.action(),
            self.store,
            self.source
        )
    }
}

impl std::error::Error for UserServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// User use-cases spanning all three stores.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create the user in every store and return the composite identifier.
    async fn create_user(
        &self,
        ctx: &RequestContext,
        name: &UserName,
    ) -> Result<UserId, UserServiceError>;

    /// Rename the user in every store, forwarding `id` unchanged.
    async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserServiceError>;
}
