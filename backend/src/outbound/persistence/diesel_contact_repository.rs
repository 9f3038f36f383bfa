//! PostgreSQL-backed `ContactRepository` implementation using Diesel ORM.
//!
//! Every statement filters on `user_id` next to any contact id, so foreign
//! rows are never read or written. Updates and deletes use `RETURNING`, which
//! makes "missing" and "owned by someone else" the same zero-row outcome.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ContactRepository, ContactRepositoryError};
use crate::domain::{
    BirthdayWindow, Contact, ContactChanges, ContactId, EmailAddress, NewContact, UserId,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{ContactChangeset, ContactRow, NewContactRow};
use super::pool::{DbPool, PoolError};
use super::schema::contacts;

const EMAIL_CONSTRAINT: &str = "contacts_user_email_key";

/// Diesel-backed implementation of the `ContactRepository` port.
#[derive(Clone)]
pub struct DieselContactRepository {
    pool: DbPool,
}

impl DieselContactRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ContactRepositoryError {
    map_basic_pool_error(error, ContactRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ContactRepositoryError {
    map_basic_diesel_error(
        error,
        ContactRepositoryError::query,
        ContactRepositoryError::connection,
    )
}

/// Like [`map_diesel_error`], but reports the per-owner email constraint as
/// a duplicate of `email`.
fn map_write_error(error: diesel::result::Error, email: &str) -> ContactRepositoryError {
    if is_unique_violation(&error, EMAIL_CONSTRAINT) {
        return ContactRepositoryError::duplicate_email(email);
    }
    map_diesel_error(error)
}

fn row_to_contact(row: ContactRow) -> Result<Contact, ContactRepositoryError> {
    Contact::try_from(row).map_err(|err| ContactRepositoryError::query(err.to_string()))
}

fn rows_to_contacts(rows: Vec<ContactRow>) -> Result<Vec<Contact>, ContactRepositoryError> {
    rows.into_iter().map(row_to_contact).collect()
}

#[async_trait]
impl ContactRepository for DieselContactRepository {
    async fn list_contacts(&self, user_id: &UserId) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_contacts(rows)
    }

    async fn get_by_id(
        &self,
        id: ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ContactRow> = contacts::table
            .filter(contacts::id.eq(id.as_i32()))
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .select(ContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }

    async fn get_by_email(
        &self,
        email: &EmailAddress,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ContactRow> = contacts::table
            .filter(contacts::email.eq(email.as_str()))
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .select(ContactRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }

    async fn search_by_last_name(
        &self,
        last_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::last_name.eq(last_name))
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_contacts(rows)
    }

    async fn search_by_first_name(
        &self,
        first_name: &str,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::first_name.eq(first_name))
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .order(contacts::id.asc())
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_contacts(rows)
    }

    async fn get_birthdays_in_range(
        &self,
        window: &BirthdayWindow,
        user_id: &UserId,
    ) -> Result<Vec<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ContactRow> = contacts::table
            .filter(contacts::birth_date.between(window.start(), window.end()))
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .order((contacts::birth_date.asc(), contacts::id.asc()))
            .select(ContactRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_contacts(rows)
    }

    async fn create(
        &self,
        contact: &NewContact,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Contact, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewContactRow {
            user_id: user_id.as_i32(),
            first_name: contact.first_name(),
            last_name: contact.last_name(),
            email: contact.email().as_str(),
            phone_number: contact.phone_number(),
            birth_date: contact.birth_date(),
            additional_data: contact.additional_data(),
            created_at: now,
            updated_at: now,
        };

        let row: ContactRow = diesel::insert_into(contacts::table)
            .values(&new_row)
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, contact.email().as_str()))?;

        row_to_contact(row)
    }

    async fn update(
        &self,
        id: ContactId,
        changes: &ContactChanges,
        user_id: &UserId,
        now: DateTime<Utc>,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let email = changes.email.as_ref().map(EmailAddress::as_str);
        let changeset = ContactChangeset {
            email,
            additional_data: changes.additional_data.as_deref(),
            birth_date: changes.birth_date,
            updated_at: now,
        };

        let row: Option<ContactRow> = diesel::update(contacts::table)
            .filter(contacts::id.eq(id.as_i32()))
            .filter(contacts::user_id.eq(user_id.as_i32()))
            .set(&changeset)
            .returning(ContactRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, email.unwrap_or_default()))?;

        row.map(row_to_contact).transpose()
    }

    async fn remove(
        &self,
        id: ContactId,
        user_id: &UserId,
    ) -> Result<Option<Contact>, ContactRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ContactRow> = diesel::delete(
            contacts::table
                .filter(contacts::id.eq(id.as_i32()))
                .filter(contacts::user_id.eq(user_id.as_i32())),
        )
        .returning(ContactRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(row_to_contact).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, ContactRepositoryError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn unique_violation_on_write_names_the_email() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        );
        let repo_err = map_write_error(diesel_err, "ada@example.com");

        assert_eq!(repo_err, ContactRepositoryError::duplicate_email("ada@example.com"));
    }

    #[rstest]
    fn unique_violation_on_read_is_a_query_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );
        let repo_err = map_diesel_error(diesel_err);

        assert!(matches!(repo_err, ContactRepositoryError::Query { .. }));
    }
}
