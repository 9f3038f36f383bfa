//! `ContactRepository` backed by a vector behind a mutex.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{ContactRepository, ContactRepositoryError};
use crate::domain::{
    BirthdayWindow, Contact, ContactChanges, ContactId, EmailAddress, NewContact, UserId,
};

#[derive(Default)]
struct State {
    last_id: i32,
    rows: Vec<Contact>,
    failure: Option<ContactRepositoryError>,
}

/// In-memory contact store with per-user `(user_id, email)` uniqueness.
#[derive(Default)]
pub struct InMemoryContactRepository {
    state: Mutex<State>,
}

impl InMemoryContactRepository {
    /// Empty store; ids start at one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<ContactRepositoryError>) {
        self.lock().failure = error;
    }

    /// Every stored contact regardless of owner, ordered by id.
    pub fn snapshot(&self) -> Vec<Contact> {
        self.lock().rows.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn guarded(&self) -> Result<MutexGuard<'_, State>, ContactRepositoryError> {
        let state = self.lock();
        match &state.failure {
            Some(error) => Err(error.clone()),
            None => Ok(state),
        }
    }

    fn select<F>(&self, user_id: &UserId, predicate: F) -> Result<Vec<Contact>, ContactRepositoryError>
    where
        F: Fn(&Contact) -> bool,
    {
        Ok(self
            .guarded()?
            .rows
            .iter()
            .filter(|row| row.user_id == *user_id && predicate(row))
            .cloned()
            .collect())
    }
}

fn email_taken(rows: &[Contact], user_id: &UserId, email: &EmailAddress, except: Option<ContactId>) -> bool {
    rows.iter()
        .any(|row| row.user_id == *user_id && row.email == *email && Some(row.id) != except)
}

#[async_trait]
impl ContactRepository for InMemoryContactRepository {
    async fn list_contacts(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        self.select(user_id, |_| true)
    }

    async fn get_by_id(
        &self,
        id: ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self.select(user_id, |row| row.id == id)?.into_iter().next())
    }

    async fn get_by_email(
        &self,
        email: &EmailAddress,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        Ok(self.select(user_id, |row| row.email == *email)?.into_iter().next())
    }

    async fn search_by_last_name(
        &self,
        last_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        self.select(user_id, |row| row.last_name == last_name)
    }

    async fn search_by_first_name(
        &self,
        first_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        self.select(user_id, |row| row.first_name == first_name)
    }

    async fn get_birthdays_in_range(
        &self,
        window: &BirthdayWindow,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        self.select(user_id, |row| window.contains(row.birth_date))
    }

    async fn create(
        &self,
        contact: &NewContact,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut state = self.guarded()?;
        if email_taken(&state.rows, user_id, contact.email(), None) {
            return Err(ContactRepositoryError::duplicate_email(contact.email().as_str()));
        }
        let next = state.last_id + 1;
        let id = ContactId::new(next)
            .map_err(|err| ContactRepositoryError::query(err.to_string()))?;
        let row = Contact {
            id,
            user_id: *user_id,
            first_name: contact.first_name().to_owned(),
            last_name: contact.last_name().to_owned(),
            email: contact.email().clone(),
            phone_number: contact.phone_number().to_owned(),
            birth_date: contact.birth_date(),
            additional_data: contact.additional_data().map(str::to_owned),
            created_at: now,
            updated_at: now,
        };
        state.last_id = next;
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut state = self.guarded()?;
        let Some(index) = state
            .rows
            .iter()
            .position(|row| row.id == id && row.user_id == *user_id)
        else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            if email_taken(&state.rows, user_id, email, Some(id)) {
                return Err(ContactRepositoryError::duplicate_email(email.as_str()));
            }
        }
        let row = &mut state.rows[index];
        changes.apply_to(row, now);
        Ok(Some(row.clone()))
    }

    async fn remove(
        &self,
        id: ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut state = self.guarded()?;
        let position = state
            .rows
            .iter()
            .position(|row| row.id == id && row.user_id == *user_id);
        Ok(position.map(|index| state.rows.remove(index)))
    }
}
