//! # Dashboard Database Crate
//!
//! This crate owns the only suspension point of the query layer: the read against the
//! relational store.
//!
//! ## Architectural Principles
//!
//! - **Store as a capability:** The `Store` trait is everything the layer needs from a
//!   database: `(statement, params) -> rows`. `PgStore` is the PostgreSQL implementation;
//!   tests substitute a scripted one.
//! - **Total executor:** `QueryExecutor::execute` never returns an `Err` and never panics.
//!   Every fault becomes a `QueryOutcome::Failure` with a sanitized message, and the raw
//!   fault goes to the log.
//! - **Asynchronous & Pooled:** `PgStore` runs on a `sqlx` connection pool.
//!
//! ## Public API
//!
//! - `connect`: establishes the PostgreSQL connection pool from the settings.
//! - `Store` / `PgStore` / `JsonRow`: the store capability and its PostgreSQL implementation.
//! - `QueryExecutor`: executes a `Query` and classifies its outcome.
//! - `DbError`: the raw faults a store can produce.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod executor;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export the key components to create a clean, public-facing API.
pub use connection::connect;
pub use error::DbError;
pub use executor::QueryExecutor;
pub use store::{JsonRow, PgStore, Store};
