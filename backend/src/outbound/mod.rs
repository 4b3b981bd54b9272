//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed adapters using Diesel ORM.
//!
//! Adapters are thin translators between domain types and storage rows.

pub mod persistence;
