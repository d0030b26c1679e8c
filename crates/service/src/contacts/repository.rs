use async_trait::async_trait;

use crate::contacts::domain::{Contact, ContactId};
use crate::errors::ServiceError;

/// Trait abstraction over the shared contact collection.
///
/// Every method is a single atomic step against the collection. There is
/// no plain `add`: insertion always goes through
/// `add_if_absent`, which performs the duplicate-email check and the insert
/// under one lock.
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Consistent snapshot of all contacts in insertion order.
    async fn list(&self) -> Vec<Contact>;
    /// Insert unless a contact with the same email exists.
    async fn add_if_absent(&self, name: String, email: String) -> Result<Contact, ServiceError>;
    /// Remove by id; returns whether a contact was removed.
    async fn remove(&self, id: ContactId) -> bool;
    /// Exact, case-sensitive email lookup. Diagnostics only.
    async fn has_email(&self, email: &str) -> bool;
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
