//! Driving port for reading the caller's contacts.
//!
//! HTTP handlers depend on this trait rather than on the repository so that
//! "absent" becomes a domain [`Error::not_found`] in exactly one place.

use async_trait::async_trait;

use crate::domain::{Contact, ContactId, EmailAddress, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactsQuery: Send + Sync {
    async fn list_contacts(&self, user_id: &UserId) -> Result<Vec<Contact>, Error>;

    /// Fails with `NotFound` when the contact is missing or owned by someone else.
    async fn get_contact(&self, user_id: &UserId, id: ContactId) -> Result<Contact, Error>;

    /// Fails with `NotFound` when the caller has no contact with this email.
    async fn find_by_email(&self, user_id: &UserId, email: &EmailAddress) -> Result<Contact, Error>;

    async fn search_by_last_name(&self, user_id: &UserId, last_name: &str) -> Result<Vec<Contact>, Error>;

    async fn search_by_first_name(&self, user_id: &UserId, first_name: &str) -> Result<Vec<Contact>, Error>;

    /// Contacts born between today and today + `days`, inclusive.
    async fn upcoming_birthdays(&self, user_id: &UserId, days: u32) -> Result<Vec<Contact>, Error>;
}
