//! User orchestration service.
//!
//! Writes each user to the relational, key-value and document stores in that
//! order. A failing step aborts the remaining steps; earlier writes are left
//! in place and no compensation is attempted.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    StoreKind, UserOperation, UserService, UserServiceError, UserStore, UserStoreError,
};
use crate::domain::{RequestContext, UserId, UserName};

/// Core [`UserService`] implementation over the three stores.
pub struct UserOrchestrator<S: ?Sized, K: ?Sized, D: ?Sized> {
    sql: Arc<S>,
    kv: Arc<K>,
    docs: Arc<D>,
}

impl<S: ?Sized, K: ?Sized, D: ?Sized> Clone for UserOrchestrator<S, K, D> {
    fn clone(&self) -> Self {
        Self {
            sql: Arc::clone(&self.sql),
            kv: Arc::clone(&self.kv),
            docs: Arc::clone(&self.docs),
        }
    }
}

impl<S: ?Sized, K: ?Sized, D: ?Sized> UserOrchestrator<S, K, D> {
    pub fn new(sql: Arc<S>, kv: Arc<K>, docs: Arc<D>) -> Self {
        Self { sql, kv, docs }
    }
}

/// Run one store call under the request deadline and tag any failure with
/// the step that produced it.
async fn step<T, F>(
    ctx: &RequestContext,
    operation: UserOperation,
    store: StoreKind,
    call: F,
) -> Result<T, UserServiceError>
where
    F: std::future::Future<Output = Result<T, UserStoreError>>,
{
    ctx.within_deadline(call)
        .await
        .unwrap_or_else(|_| Err(UserStoreError::deadline_exceeded()))
        .map_err(|source| UserServiceError::new(operation, store, source))
}

#[async_trait]
impl<S, K, D> UserService for UserOrchestrator<S, K, D>
where
    S: UserStore + ?Sized,
    K: UserStore + ?Sized,
    D: UserStore + ?Sized,
{
    async fn create_user(
        &self,
        ctx: &RequestContext,
        name: &UserName,
    ) -> Result<UserId, UserServiceError> {
        let op = UserOperation::CreateUser;
        let sql_id = step(ctx, op, StoreKind::Sql, self.sql.insert(ctx, name)).await?;
        let kv_id = step(ctx, op, StoreKind::Kv, self.kv.insert(ctx, name)).await?;
        let docs_id = step(ctx, op, StoreKind::Docs, self.docs.insert(ctx, name)).await?;
        Ok(UserId::compose(&sql_id, &kv_id, &docs_id))
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserServiceError> {
        let op = UserOperation::UpdateUser;
        step(ctx, op, StoreKind::Sql, self.sql.update(ctx, id, name)).await?;
        step(ctx, op, StoreKind::Kv, self.kv.update(ctx, id, name)).await?;
        step(ctx, op, StoreKind::Docs, self.docs.update(ctx, id, name)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
