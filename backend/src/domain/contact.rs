//! Address-book entries owned by a single user.
//!
//! A contact is a plain record; persistence lives behind
//! [`crate::domain::ports::ContactRepository`], which scopes every lookup and
//! mutation to the owning [`UserId`].

use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{EmailAddress, UserId};

/// Validation failures for contact fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactValidationError {
    #[error("contact id must be a positive integer")]
    InvalidId,
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("phone number may only contain digits, spaces, and + - ( )")]
    InvalidPhoneNumber,
    #[error("birthday window starts after it ends")]
    InvertedWindow,
}

impl ContactValidationError {
    /// Name of the offending request field, in wire (camelCase) form.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::EmptyField { field } | Self::FieldTooLong { field, .. } => field,
            Self::InvalidPhoneNumber => "phoneNumber",
            Self::InvertedWindow => "days",
        }
    }
}

/// Database identifier of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct ContactId(i32);

impl ContactId {
    /// Wrap a database id. Zero and negative ids are rejected.
    pub fn new(id: i32) -> Result<Self, ContactValidationError> {
        if id <= 0 {
            return Err(ContactValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Raw column value.
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ContactId> for i32 {
    fn from(value: ContactId) -> Self {
        value.0
    }
}

impl TryFrom<i32> for ContactId {
    type Error = ContactValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Longest accepted first or last name, in characters.
pub const NAME_MAX: usize = 100;
/// Longest accepted phone number, in characters, after trimming.
pub const PHONE_NUMBER_MAX: usize = 32;

/// Persisted contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: ContactId,
    /// Owning user; every query and mutation is scoped by it.
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    /// Unique among the owner's contacts.
    pub email: EmailAddress,
    pub phone_number: String,
    pub birth_date: NaiveDate,
    /// Free-form note. Never blank when present.
    pub additional_data: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Bumped by every update, including empty ones.
    pub updated_at: DateTime<Utc>,
}

/// Validated fields for a contact that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    first_name: String,
    last_name: String,
    email: EmailAddress,
    phone_number: String,
    birth_date: NaiveDate,
    additional_data: Option<String>,
}

impl NewContact {
    /// Validate and normalise raw contact fields.
    ///
    /// Names and the phone number are trimmed; an additional-data string that
    /// is blank after trimming is stored as absent.
    pub fn try_new(
        first_name: &str,
        last_name: &str,
        email: EmailAddress,
        phone_number: &str,
        birth_date: NaiveDate,
        additional_data: Option<&str>,
    ) -> Result<Self, ContactValidationError> {
        Ok(Self {
            first_name: validated_name(first_name, "firstName")?,
            last_name: validated_name(last_name, "lastName")?,
            email,
            phone_number: validated_phone_number(phone_number)?,
            birth_date,
            additional_data: normalised_additional_data(additional_data),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn additional_data(&self) -> Option<&str> {
        self.additional_data.as_deref()
    }
}

fn validated_name(raw: &str, field: &'static str) -> Result<String, ContactValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ContactValidationError::EmptyField { field });
    }
    if name.chars().count() > NAME_MAX {
        return Err(ContactValidationError::FieldTooLong {
            field,
            max: NAME_MAX,
        });
    }
    Ok(name.to_owned())
}

fn validated_phone_number(raw: &str) -> Result<String, ContactValidationError> {
    let phone = raw.trim();
    if phone.is_empty() {
        return Err(ContactValidationError::EmptyField {
            field: "phoneNumber",
        });
    }
    if phone.chars().count() > PHONE_NUMBER_MAX {
        return Err(ContactValidationError::FieldTooLong {
            field: "phoneNumber",
            max: PHONE_NUMBER_MAX,
        });
    }
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')');
    if !phone.chars().all(allowed) || !phone.chars().any(|c| c.is_ascii_digit()) {
        return Err(ContactValidationError::InvalidPhoneNumber);
    }
    Ok(phone.to_owned())
}

fn normalised_additional_data(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Partial update of the mutable contact fields.
///
/// `None` leaves the stored value untouched. Names and the phone number are
/// not part of the update surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub email: Option<EmailAddress>,
    pub additional_data: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl ContactChanges {
    /// Build an update, treating blank additional data as not supplied.
    pub fn new(
        email: Option<EmailAddress>,
        additional_data: Option<&str>,
        birth_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            email,
            additional_data: normalised_additional_data(additional_data),
            birth_date,
        }
    }

    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.additional_data.is_none() && self.birth_date.is_none()
    }

    /// Apply the supplied fields to `contact` and stamp `updated_at`.
    pub fn apply_to(&self, contact: &mut Contact, updated_at: DateTime<Utc>) {
        if let Some(email) = &self.email {
            contact.email = email.clone();
        }
        if let Some(additional_data) = &self.additional_data {
            contact.additional_data = Some(additional_data.clone());
        }
        if let Some(birth_date) = self.birth_date {
            contact.birth_date = birth_date;
        }
        contact.updated_at = updated_at;
    }
}

/// Default look-ahead for upcoming birthdays, in days.
pub const DEFAULT_BIRTHDAY_WINDOW_DAYS: u32 = 7;
/// Largest accepted look-ahead, in days.
pub const MAX_BIRTHDAY_WINDOW_DAYS: u32 = 365;

/// Inclusive date range used to select contacts by birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl BirthdayWindow {
    /// Inclusive `[start, end]`; fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ContactValidationError> {
        if start > end {
            return Err(ContactValidationError::InvertedWindow);
        }
        Ok(Self { start, end })
    }

    /// `[today, today + days]`, saturating at the end of the calendar.
    pub fn upcoming(today: NaiveDate, days: u32) -> Self {
        let end = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);
        Self { start: today, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}
