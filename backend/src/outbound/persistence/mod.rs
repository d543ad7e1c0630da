//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Two databases back the service:
//!
//! - the **relational store** (`users`, `files`, `elements`,
//!   `element_categories`), described by `schema.rs`;
//! - the **observation store** (`observation_points`), described by
//!   `observation_schema.rs`.
//!
//! Each gets its own [`DbPool`]. The stores are never joined in SQL; the
//! domain query service joins them in memory.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions are
//!   private to this module.
//! - **Strongly typed errors**: pool and Diesel failures map onto each port's
//!   `Connection`/`Query` error split.
//!
//! # Example
//!
//! ```ignore
//! use marine_backend::outbound::persistence::{
//!     DbPool, DieselObservationRepository, PoolConfig,
//! };
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/observations")).await?;
//! let repo = DieselObservationRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_element_repository;
mod diesel_file_metadata_repository;
mod diesel_observation_repository;
mod migrations;
mod models;
mod observation_schema;
mod pool;
mod schema;

pub use diesel_element_repository::DieselElementRepository;
pub use diesel_file_metadata_repository::DieselFileMetadataRepository;
pub use diesel_observation_repository::DieselObservationRepository;
pub use migrations::{
    MigrationError, OBSERVATION_MIGRATIONS, RELATIONAL_MIGRATIONS, run_migrations,
};
pub use pool::{DbPool, PoolConfig, PoolError};
