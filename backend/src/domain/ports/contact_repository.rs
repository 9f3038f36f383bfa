//! Port for contact persistence.
//!
//! Every method takes the acting user's id. Adapters must apply it as a
//! predicate alongside any contact id, so a contact owned by someone else is
//! indistinguishable from one that does not exist.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{BirthdayWindow, Contact, ContactChanges, ContactId, EmailAddress, NewContact, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by contact repository adapters.
    pub enum ContactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "contact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "contact repository query failed: {message}",
        /// The owner already has a contact with this email.
        DuplicateEmail { email: String } =>
            "contact email already exists: {email}",
    }
}

/// Per-user contact store.
///
/// Absence is reported through `Option` or an empty `Vec`, never as an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// All contacts owned by `user_id`, ordered by id.
    async fn list_contacts(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactRepositoryError>;

    async fn get_by_id(
        &self,
        id: ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    async fn get_by_email(
        &self,
        email: &EmailAddress,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Exact, case-sensitive match on last name.
    async fn search_by_last_name(
        &self,
        last_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Exact, case-sensitive match on first name.
    async fn search_by_first_name(
        &self,
        first_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Contacts whose birth date lies inside `window`, bounds included.
    async fn get_birthdays_in_range(
        &self,
        window: &BirthdayWindow,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError>;

    /// Insert a contact owned by `user_id` with both timestamps set to `now`.
    ///
    /// Returns [`ContactRepositoryError::DuplicateEmail`] when the owner
    /// already stores that email.
    async fn create(
        &self,
        contact: &NewContact,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Contact, ContactRepositoryError>;

    /// Overwrite the supplied fields of an owned contact and set
    /// `updated_at = now`. Returns `None` without writing when the contact is
    /// missing or foreign.
    async fn update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Contact>, ContactRepositoryError>;

    /// Delete an owned contact, returning its last state. Returns `None`
    /// without writing when the contact is missing or foreign.
    async fn remove(
        &self,
        id: ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError>;
}
