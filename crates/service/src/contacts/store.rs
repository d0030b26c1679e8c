use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::contacts::domain::{Contact, ContactId, NewContact};
use crate::contacts::repository::ContactRepository;
use crate::errors::ServiceError;

/// Backing state. Only reachable through the store's lock.
#[derive(Debug)]
struct ContactList {
    next_id: ContactId,
    contacts: Vec<Contact>,
}

impl ContactList {
    fn new() -> Self {
        Self { next_id: 1, contacts: Vec::new() }
    }

    fn has_email(&self, email: &str) -> bool {
        self.contacts.iter().any(|c| c.email == email)
    }

    fn index_of(&self, id: ContactId) -> Option<usize> {
        self.contacts.iter().position(|c| c.id == id)
    }
}

/// In-memory contact collection shared by all request handlers.
///
/// Ids start at 1 and are never reused, even after removal. Insertion order
/// is preserved. Each operation acquires the lock once and releases it
/// before returning, so callers never observe a partially applied change.
#[derive(Debug)]
pub struct ContactStore {
    inner: Mutex<ContactList>,
}

impl Default for ContactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStore {
    /// Empty store; the first contact gets id 1.
    pub fn new() -> Self {
        Self { inner: Mutex::new(ContactList::new()) }
    }

    /// Build a shared store pre-populated with `seed`, in order.
    /// Seeds whose email is already taken are skipped.
    pub async fn with_seed<I>(seed: I) -> Arc<Self>
    where
        I: IntoIterator<Item = NewContact>,
    {
        let store = Self::new();
        for NewContact { name, email } in seed {
            if let Err(e) = store.add_if_absent(name, email).await {
                warn!(error = %e, "skipping seed contact");
            }
        }
        Arc::new(store)
    }

    /// Consistent snapshot of all contacts in insertion order.
    pub async fn list(&self) -> Vec<Contact> {
        let list = self.inner.lock().await;
        list.contacts.clone()
    }

    /// Insert a new contact unless one with the same email exists.
    ///
    /// The duplicate check and the insert run under the same lock guard.
    pub async fn add_if_absent(
        &self,
        name: String,
        email: String,
    ) -> Result<Contact, ServiceError> {
        let mut list = self.inner.lock().await;
        if list.has_email(&email) {
            debug!(%email, "duplicate email rejected");
            return Err(ServiceError::DuplicateEmail(email));
        }
        let contact = Contact { id: list.next_id, name, email };
        list.next_id += 1;
        list.contacts.push(contact.clone());
        drop(list);
        info!(id = contact.id, email = %contact.email, "contact added");
        Ok(contact)
    }

    /// Remove the contact with `id`; returns whether it existed.
    pub async fn remove(&self, id: ContactId) -> bool {
        let mut list = self.inner.lock().await;
        let Some(index) = list.index_of(id) else {
            debug!(id, "remove: contact not found");
            return false;
        };
        list.contacts.remove(index);
        drop(list);
        info!(id, "contact removed");
        true
    }

    /// Exact, case-sensitive email lookup.
    pub async fn has_email(&self, email: &str) -> bool {
        self.inner.lock().await.has_email(email)
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.contacts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ContactRepository for ContactStore {
    async fn list(&self) -> Vec<Contact> {
        self.list().await
    }

    async fn add_if_absent(&self, name: String, email: String) -> Result<Contact, ServiceError> {
        self.add_if_absent(name, email).await
    }

    async fn remove(&self, id: ContactId) -> bool {
        self.remove(id).await
    }

    async fn has_email(&self, email: &str) -> bool {
        self.has_email(email).await
    }

    async fn len(&self) -> usize {
        self.len().await
    }
}
