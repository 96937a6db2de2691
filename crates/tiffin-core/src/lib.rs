//! Shared plumbing for Tiffin services: tracing setup, health handlers, HTTP middleware and
//! serialization helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
