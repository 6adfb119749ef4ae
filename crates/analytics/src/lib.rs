//! # Dashboard Analytics
//!
//! The query catalog of the admin dashboards: which statements feed which widget, the row
//! types they decode into, and how a dashboard's initial load is run.
//!
//! ## Architectural Principles
//!
//! - **Independent widgets:** A dashboard's queries run concurrently and each keeps its own
//!   `QueryOutcome`. One failing widget never prevents the others from rendering.
//! - **Paged resources as data:** A paginated table is described by a `PagedResource`: a
//!   count statement, a windowed statement and a row type. The server-side endpoint is
//!   generic over it.
//!
//! ## Public API
//!
//! - `load_orgs_dashboard` / `load_users_dashboard`: the initial loads.
//! - `OrgsDashboard` / `UsersDashboard` / `DashboardKind`: the loaded bundles.
//! - `PagedResource` / `UsersResource` / `OrganizationsResource` / `ResourceKind`.
//! - `rows`: the record types every query decodes into.

pub mod dashboards;
pub mod error;
pub mod queries;
pub mod resources;
pub mod rows;

pub use dashboards::{
    Dashboard, DashboardKind, OrgsDashboard, UsersDashboard, load_dashboard, load_orgs_dashboard,
    load_users_dashboard,
};
pub use error::AnalyticsError;
pub use resources::{OrganizationsResource, PagedResource, ResourceKind, UsersResource};
