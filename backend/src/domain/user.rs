//! User data model.
//!
//! A user exists as three independent store-local records. The only value
//! callers see is the composite [`UserId`] derived from the three per-store
//! [`StoreId`]s returned by a successful create.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default upper bound for [`UserName`] length, in characters.
pub const USER_NAME_MAX: usize = 256;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The name is the empty string.
    #[error("name must not be empty")]
    EmptyName,
    /// The name exceeds the configured maximum length.
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    /// The user identifier is the empty string.
    #[error("user id must not be empty")]
    EmptyId,
}

/// Validated user name.
///
/// # Examples
/// ```
/// use tristore::domain::UserName;
///
/// let name = UserName::new("alice").expect("valid name");
/// assert_eq!(name.as_str(), "alice");
/// assert!(UserName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// Validate a name against the default length bound.
    pub fn new(name: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::with_max_length(name, USER_NAME_MAX)
    }

    /// Validate a name against an explicit length bound.
    pub fn with_max_length(
        name: impl Into<String>,
        max: usize,
    ) -> Result<Self, UserValidationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if name.chars().count() > max {
            return Err(UserValidationError::NameTooLong { max });
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Identifier assigned to a user record by a single store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreId(String);

impl StoreId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally visible user identifier.
///
/// Created users receive `"{sql}-{kv}-{doc}"`. Updates treat the value as an
/// opaque token and never split it.
///
/// # Examples
/// ```
/// use tristore::domain::{StoreId, UserId};
///
/// let id = UserId::compose(&StoreId::new("1"), &StoreId::new("2"), &StoreId::new("3"));
/// assert_eq!(id.as_str(), "1-2-3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Wrap an opaque identifier supplied by a caller.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Derive the composite identifier from the per-store identifiers.
    pub fn compose(sql: &StoreId, kv: &StoreId, docs: &StoreId) -> Self {
        Self(format!("{sql}-{kv}-{docs}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
