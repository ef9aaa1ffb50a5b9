//! PostgreSQL-backed relational `UserStore` using Diesel.
//!
//! The store never mints identifiers; `user_id` comes from the column's
//! sequence default and is discovered according to [`SqlIdStrategy`].

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UserStore, UserStoreError};
use crate::domain::{RequestContext, StoreId, UserId, UserName};

use super::models::{NewUserRow, UserRename};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// How the identifier of a freshly inserted row is discovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SqlIdStrategy {
    /// `INSERT ... RETURNING user_id`.
    #[default]
    Returning,
    /// Plain `INSERT` followed by selecting the newest row by `created_at`.
    /// Concurrent writers may observe each other's rows.
    LatestRow,
}

impl SqlIdStrategy {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Returning => "returning",
            Self::LatestRow => "latest_row",
        }
    }
}

impl fmt::Display for SqlIdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sql id strategy `{0}`; expected `returning` or `latest_row`")]
pub struct ParseSqlIdStrategyError(String);

impl FromStr for SqlIdStrategy {
    type Err = ParseSqlIdStrategyError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "returning" => Ok(Self::Returning),
            "latest_row" => Ok(Self::LatestRow),
            _ => Err(ParseSqlIdStrategyError(raw.to_owned())),
        }
    }
}

/// Diesel-backed implementation of the relational [`UserStore`].
#[derive(Clone)]
pub struct DieselUserStore {
    pool: DbPool,
    strategy: SqlIdStrategy,
}

impl DieselUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            strategy: SqlIdStrategy::default(),
        }
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: SqlIdStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

fn map_pool_error(error: PoolError) -> UserStoreError {
    UserStoreError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> UserStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => UserStoreError::not_found("no user row found"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserStoreError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) => UserStoreError::query(info.message()),
        DieselError::QueryBuilderError(_) => UserStoreError::query("database query error"),
        _ => UserStoreError::query("database error"),
    }
}

#[async_trait]
impl UserStore for DieselUserStore {
    async fn insert(
        &self,
        _ctx: &RequestContext,
        name: &UserName,
    ) -> Result<StoreId, UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            name: name.as_str(),
            created_at: Utc::now(),
        };

        let user_id = match self.strategy {
            SqlIdStrategy::Returning => diesel::insert_into(users::table)
                .values(&row)
                .returning(users::user_id)
                .get_result::<String>(&mut conn)
                .await
                .map_err(map_diesel_error)?,
            SqlIdStrategy::LatestRow => {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                users::table
                    .select(users::user_id)
                    .order(users::created_at.desc())
                    .first::<String>(&mut conn)
                    .await
                    .map_err(map_diesel_error)?
            }
        };

        Ok(StoreId::new(user_id))
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let touched = diesel::update(users::table.filter(users::user_id.eq(id.as_str())))
            .set(&UserRename {
                name: name.as_str(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        debug!(user_id = id.as_str(), touched, "relational rename applied");
        Ok(())
    }
}
