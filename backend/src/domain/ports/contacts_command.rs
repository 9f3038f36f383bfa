//! Driving port for mutating the caller's contacts.

use async_trait::async_trait;

use crate::domain::{Contact, ContactChanges, ContactId, Error, NewContact, UserId};

/// Request to add a contact to the caller's address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateContactRequest {
    pub user_id: UserId,
    pub contact: NewContact,
}

/// Request to change the mutable fields of an existing contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateContactRequest {
    pub user_id: UserId,
    pub contact_id: ContactId,
    pub changes: ContactChanges,
}

/// Request to delete a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveContactRequest {
    pub user_id: UserId,
    pub contact_id: ContactId,
}

/// Contact mutations.
///
/// Foreign and missing contacts both surface as `NotFound`; a duplicate
/// email within the caller's book surfaces as `Conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsCommand: Send + Sync {
    async fn create_contact(&self, request: CreateContactRequest) -> Result<Contact, Error>;

    async fn update_contact(&self, request: UpdateContactRequest) -> Result<Contact, Error>;

    /// Returns the removed contact's last state.
    async fn remove_contact(&self, request: RemoveContactRequest) -> Result<Contact, Error>;
}
