//! HTTP layer of the Scribe service.
//!
//! Exposes the router builder and everything it needs so the binary and the
//! integration tests assemble the same application.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod routes;
pub mod state;
pub mod upload;
