//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live here so
//! repositories stay focused on queries.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::domain::{Contact, ContactId, EmailAddress, User, UserId};

use super::schema::{contacts, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password: String,
    pub refresh_token: Option<String>,
    pub avatar: Option<String>,
    pub confirmed: bool,
    pub confirmation_token: Option<String>,
    #[expect(dead_code, reason = "selected for parity with the table; not surfaced")]
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub avatar: Option<&'a str>,
    pub confirmation_token: Option<&'a str>,
}

/// Row struct for reading from the contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContactRow {
    pub id: i32,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub birth_date: NaiveDate,
    pub additional_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new contacts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contacts)]
pub(crate) struct NewContactRow<'a> {
    pub user_id: i32,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub birth_date: NaiveDate,
    pub additional_data: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset for partial contact updates.
///
/// `None` fields are skipped by Diesel, so only supplied values are written.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = contacts)]
pub(crate) struct ContactChangeset<'a> {
    pub email: Option<&'a str>,
    pub additional_data: Option<&'a str>,
    pub birth_date: Option<NaiveDate>,
    pub updated_at: DateTime<Utc>,
}

/// Failure converting a stored row into a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupted {table}.{column} in database: {reason}")]
pub(crate) struct RowConversionError {
    pub table: &'static str,
    pub column: &'static str,
    pub reason: String,
}

impl RowConversionError {
    fn new(table: &'static str, column: &'static str, reason: impl ToString) -> Self {
        Self {
            table,
            column,
            reason: reason.to_string(),
        }
    }
}

impl TryFrom<UserRow> for User {
    type Error = RowConversionError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let id = UserId::new(row.id).map_err(|err| RowConversionError::new("users", "id", err))?;
        let email =
            EmailAddress::new(&row.email).map_err(|err| RowConversionError::new("users", "email", err))?;
        Ok(Self {
            id,
            username: row.username,
            email,
            password_hash: row.password,
            refresh_token_digest: row.refresh_token,
            avatar: row.avatar,
            confirmed: row.confirmed,
            confirmation_token_digest: row.confirmation_token,
        })
    }
}

impl TryFrom<ContactRow> for Contact {
    type Error = RowConversionError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let id = ContactId::new(row.id).map_err(|err| RowConversionError::new("contacts", "id", err))?;
        let user_id =
            UserId::new(row.user_id).map_err(|err| RowConversionError::new("contacts", "user_id", err))?;
        let email = EmailAddress::new(&row.email)
            .map_err(|err| RowConversionError::new("contacts", "email", err))?;
        Ok(Self {
            id,
            user_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone_number: row.phone_number,
            birth_date: row.birth_date,
            additional_data: row.additional_data,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
