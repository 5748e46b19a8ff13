//! Service-agnostic plumbing shared by siakad binaries: tracing setup,
//! health handlers, request-id middleware, and serde helpers.

pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
