//! Domain primitives for the siakad backend.
//!
//! This crate contains only pure types with no framework dependencies;
//! anything that needs axum, sea-orm, or an HTTP client lives in the
//! service crate instead.

pub mod pagination;
pub mod role;
