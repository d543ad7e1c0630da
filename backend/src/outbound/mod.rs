//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories for both stores (Diesel)
//! - **cache**: Redis-backed query result cache (`bb8-redis`)
//! - **metrics**: Prometheus-backed cache metrics (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod persistence;
