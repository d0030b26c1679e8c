//! Service layer for the contacts demo.
//! - Owns the authoritative in-memory contact list.
//! - Keeps every check-then-mutate step inside a single critical section.
//! - Provides clear error types and documented interfaces.

pub mod contacts;
pub mod errors;

pub use contacts::{
    domain::{Contact, ContactId, NewContact},
    repository::ContactRepository,
    store::ContactStore,
};
pub use errors::ServiceError;
