//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod id_generator;
mod user_service;
mod user_service_metrics;
mod user_store;

#[cfg(test)]
pub use id_generator::MockIdGenerator;
pub use id_generator::IdGenerator;
#[cfg(test)]
pub use user_service::MockUserService;
pub use user_service::{StoreKind, UserOperation, UserService, UserServiceError};
pub use user_service_metrics::{NoOpUserServiceMetrics, UserServiceMetrics};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserStore, UserStoreError};
