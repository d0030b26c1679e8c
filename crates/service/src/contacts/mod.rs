//! Contact storage
//!
//! `store::ContactStore` is the single shared collection used by all request
//! handlers; `repository::ContactRepository` is the seam the HTTP layer codes
//! against.

pub mod domain;
pub mod repository;
pub mod store;
