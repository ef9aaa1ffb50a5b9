//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: relational store on PostgreSQL via Diesel
//! - **cache**: key-value store on Redis via `bb8-redis`
//! - **documents**: document store on MongoDB
//! - **ids**: random identifier generator
//! - **metrics**: Prometheus-backed metrics exporters (feature-gated)
//!
//! Adapters translate between domain types and backend representations and
//! contain no business logic.

pub mod cache;
pub mod documents;
pub mod ids;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
