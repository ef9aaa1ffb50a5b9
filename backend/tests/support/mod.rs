//! In-memory stores and an application builder for end-to-end HTTP tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;

use tristore::domain::ports::{NoOpUserServiceMetrics, UserStore, UserStoreError};
use tristore::domain::{
    InstrumentedUserService, LoggingUserService, RequestContext, StoreId, UserId, UserName,
    UserOrchestrator,
};
use tristore::inbound::http::health::HealthState;
use tristore::inbound::http::state::HttpState;
use tristore::inbound::http::validation::RequestValidator;
use tristore::inbound::http::{configure_health, configure_users};
use tristore::middleware::{LogMode, Recovery, RequestIdMiddleware, RequestLogging};

/// Store failure injected by a [`MemoryStore`].
#[derive(Clone, Copy)]
pub enum Fault {
    None,
    Fail(fn() -> UserStoreError),
    Panic,
}

/// A store that hands out sequential ids and remembers every write.
pub struct MemoryStore {
    next_id: AtomicU64,
    rows: Mutex<HashMap<String, String>>,
    updates: Mutex<Vec<(String, String)>>,
    insert_fault: Fault,
    update_fault: Fault,
}

impl MemoryStore {
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            next_id: AtomicU64::new(first_id),
            rows: Mutex::new(HashMap::new()),
            updates: Mutex::new(Vec::new()),
            insert_fault: Fault::None,
            update_fault: Fault::None,
        }
    }

    pub fn failing_insert(mut self, fault: Fault) -> Self {
        self.insert_fault = fault;
        self
    }

    pub fn failing_update(mut self, fault: Fault) -> Self {
        self.update_fault = fault;
        self
    }

    pub fn rows(&self) -> HashMap<String, String> {
        self.rows.lock().expect("rows lock").clone()
    }

    pub fn updates(&self) -> Vec<(String, String)> {
        self.updates.lock().expect("updates lock").clone()
    }
}

fn inject(fault: Fault) -> Result<(), UserStoreError> {
    match fault {
        Fault::None => Ok(()),
        Fault::Fail(make) => Err(make()),
        Fault::Panic => panic!("store blew up"),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(
        &self,
        _ctx: &RequestContext,
        name: &UserName,
    ) -> Result<StoreId, UserStoreError> {
        inject(self.insert_fault)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.rows
            .lock()
            .expect("rows lock")
            .insert(id.clone(), name.as_str().to_owned());
        Ok(StoreId::new(id))
    }

    async fn update(
        &self,
        _ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserStoreError> {
        inject(self.update_fault)?;
        self.updates
            .lock()
            .expect("updates lock")
            .push((id.as_str().to_owned(), name.as_str().to_owned()));
        Ok(())
    }
}

/// One store of each kind, with distinct id ranges.
#[derive(Clone)]
pub struct Stores {
    pub sql: Arc<MemoryStore>,
    pub kv: Arc<MemoryStore>,
    pub docs: Arc<MemoryStore>,
}

impl Default for Stores {
    fn default() -> Self {
        Self::new(
            MemoryStore::starting_at(1),
            MemoryStore::starting_at(101),
            MemoryStore::starting_at(1001),
        )
    }
}

impl Stores {
    pub fn new(sql: MemoryStore, kv: MemoryStore, docs: MemoryStore) -> Self {
        Self {
            sql: Arc::new(sql),
            kv: Arc::new(kv),
            docs: Arc::new(docs),
        }
    }
}

/// Build the application with the production decorator and middleware
/// order over the given stores.
///
/// Takes the handles by value so the returned factory owns everything it
/// needs and can be handed to `init_service`.
pub fn app(
    stores: Stores,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + 'static>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let Stores { sql, kv, docs } = stores;
    let orchestrator = UserOrchestrator::new(sql, kv, docs);
    let users = LoggingUserService::new(InstrumentedUserService::new(
        orchestrator,
        Arc::new(NoOpUserServiceMetrics),
    ));
    let http_state = HttpState::new(Arc::new(users), RequestValidator::default());
    let health_state = HealthState::new();
    health_state.mark_ready();

    App::new()
        .app_data(web::Data::new(health_state))
        .app_data(web::Data::new(http_state))
        .configure(configure_health)
        .configure(configure_users)
        .wrap(Recovery)
        .wrap(RequestLogging::new(LogMode::Release))
        .wrap(RequestIdMiddleware)
}
