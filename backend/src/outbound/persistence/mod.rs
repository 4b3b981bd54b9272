//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the clinic's driven ports backed by
//! PostgreSQL via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: implementations only translate between Diesel rows
//!   and domain types. The visit step sequence lives in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Transactions**: multi-row writes run inside
//!   `AsyncConnection::transaction`; an `Err` from the closure rolls back.
//!
//! # Example
//!
//! ```ignore
//! use clinica::outbound::persistence::{DbPool, DieselVisitStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clinica")).await?;
//! let store = DieselVisitStore::new(pool);
//! ```

mod diesel_doctor_provisioning;
mod diesel_error_mapping;
mod diesel_staff_directory;
mod diesel_visit_store;
mod models;
mod pool;
mod schema;

pub use diesel_doctor_provisioning::DieselDoctorProvisioning;
pub use diesel_staff_directory::DieselStaffDirectory;
pub use diesel_visit_store::DieselVisitStore;
pub use pool::{DbPool, PoolConfig, PoolError};
