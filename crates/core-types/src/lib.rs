//! # Dashboard Core Types
//!
//! The shared vocabulary of the query execution and result-delivery layer.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** This crate has no knowledge of the store, HTTP, or any runtime. Every
//!   other crate in the workspace speaks in these types.
//! - **Outcomes, not exceptions:** A query either produced rows or it failed, and
//!   `QueryOutcome` makes that a two-variant enum the compiler checks exhaustively.
//!
//! ## Public API
//!
//! - `Query` / `QueryParam`: an immutable statement plus its positional parameters.
//! - `QueryOutcome` / `QueryFailure` / `FailureKind`: the classified result of a query.
//! - `PageRequest` / `PagedResult`: the pagination window and its result.
//! - `OutcomeGate` / `View`: the guard every outcome passes through before presentation.

pub mod enums;
pub mod error;
pub mod gate;
pub mod outcome;
pub mod pagination;
pub mod query;

// Re-export the core types to provide a clean public API.
pub use enums::FailureKind;
pub use error::CoreError;
pub use gate::{OutcomeGate, View};
pub use outcome::{QueryFailure, QueryOutcome};
pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest, PagedResult};
pub use query::{Query, QueryParam};
