//! Contact use-cases.
//!
//! Implements [`ContactsQuery`] and [`ContactsCommand`] over a
//! [`ContactRepository`]. Repository absence becomes `NotFound` here, and
//! timestamps come from the injected clock so tests can control them.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    ContactRepository, ContactRepositoryError, ContactsCommand, ContactsQuery,
    CreateContactRequest, RemoveContactRequest, UpdateContactRequest,
};
use crate::domain::{BirthdayWindow, Contact, ContactId, EmailAddress, Error, UserId};

const CONTACT_NOT_FOUND: &str = "contact not found";
const DUPLICATE_EMAIL: &str = "Email already exists!";

/// Contact service implementing the contact driving ports.
#[derive(Clone)]
pub struct ContactsService<R> {
    contacts: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ContactsService<R> {
    /// Service over `contacts`; `clock` stamps creation and update times.
    pub fn new(contacts: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { contacts, clock }
    }
}

impl<R> ContactsService<R>
where
    R: ContactRepository,
{
    fn map_repository_error(error: ContactRepositoryError) -> Error {
        match error {
            ContactRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("contact repository unavailable: {message}"))
            }
            ContactRepositoryError::Query { message } => {
                Error::internal(format!("contact repository error: {message}"))
            }
            ContactRepositoryError::DuplicateEmail { .. } => Self::duplicate_email(),
        }
    }

    fn duplicate_email() -> Error {
        Error::conflict(DUPLICATE_EMAIL).with_details(json!({
            "field": "email",
            "code": "duplicate_email",
        }))
    }

    fn not_found(id: ContactId) -> Error {
        Error::not_found(CONTACT_NOT_FOUND).with_details(json!({ "contactId": id.as_i32() }))
    }
}

#[async_trait]
impl<R> ContactsQuery for ContactsService<R>
where
    R: ContactRepository,
{
    async fn list_contacts(&self, user_id: &UserId) -> Result<Vec<Contact>, Error> {
        self.contacts
            .list_contacts(user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get_contact(&self, user_id: &UserId, id: ContactId) -> Result<Contact, Error> {
        self.contacts
            .get_by_id(id, user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(id))
    }

    async fn find_by_email(&self, user_id: &UserId, email: &EmailAddress) -> Result<Contact, Error> {
        self.contacts
            .get_by_email(email, user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(CONTACT_NOT_FOUND))
    }

    async fn search_by_last_name(&self, user_id: &UserId, last_name: &str) -> Result<Vec<Contact>, Error> {
        self.contacts
            .search_by_last_name(last_name.trim(), user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn search_by_first_name(&self, user_id: &UserId, first_name: &str) -> Result<Vec<Contact>, Error> {
        self.contacts
            .search_by_first_name(first_name.trim(), user_id)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn upcoming_birthdays(&self, user_id: &UserId, days: u32) -> Result<Vec<Contact>, Error> {
        let today = self.clock.utc().date_naive();
        let window = BirthdayWindow::upcoming(today, days);
        self.contacts
            .get_birthdays_in_range(&window, user_id)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R> ContactsCommand for ContactsService<R>
where
    R: ContactRepository,
{
    async fn create_contact(&self, request: CreateContactRequest) -> Result<Contact, Error> {
        let CreateContactRequest { user_id, contact } = request;

        // The unique (user_id, email) constraint still backs this up under races.
        let existing = self
            .contacts
            .get_by_email(contact.email(), &user_id)
            .await
            .map_err(Self::map_repository_error)?;
        if existing.is_some() {
            return Err(Self::duplicate_email());
        }

        let created = self
            .contacts
            .create(&contact, &user_id, self.clock.utc())
            .await
            .map_err(Self::map_repository_error)?;
        info!(user_id = %user_id, contact_id = %created.id, "contact created");
        Ok(created)
    }

    async fn update_contact(&self, request: UpdateContactRequest) -> Result<Contact, Error> {
        let UpdateContactRequest {
            user_id,
            contact_id,
            changes,
        } = request;

        let updated = self
            .contacts
            .update(contact_id, &changes, &user_id, self.clock.utc())
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(contact_id))?;
        info!(user_id = %user_id, contact_id = %contact_id, "contact updated");
        Ok(updated)
    }

    async fn remove_contact(&self, request: RemoveContactRequest) -> Result<Contact, Error> {
        let RemoveContactRequest {
            user_id,
            contact_id,
        } = request;

        let removed = self
            .contacts
            .remove(contact_id, &user_id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Self::not_found(contact_id))?;
        info!(user_id = %user_id, contact_id = %contact_id, "contact removed");
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "contacts_service_tests.rs"]
mod tests;
