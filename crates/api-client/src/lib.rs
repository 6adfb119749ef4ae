//! Client side of the paginated-resource protocol.
//!
//! `PagedResourceClient` keeps the page a view is showing and the outcome it last
//! received. It reaches the server through a `PageTransport`, which is HTTP in production
//! (`HttpPageTransport`) and a scripted fake in tests.

pub mod client;
pub mod error;
pub mod transport;

// --- Public API ---
pub use client::{ClientPhase, PageSnapshot, PagedResourceClient};
pub use error::ApiError;
pub use transport::{HttpPageTransport, PageTransport};
