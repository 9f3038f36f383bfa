//! Domain primitives, services and ports.
//!
//! Purpose: keep the contact and account rules independent of HTTP and SQL.
//! Inbound adapters call the driving ports implemented by the services here;
//! the services reach storage and third parties only through driven ports.
//!
//! Public surface:
//! - `Contact`, `NewContact`, `ContactChanges`, `BirthdayWindow`: address
//!   book records and their inputs.
//! - `User`, `NewUser`, `EmailAddress`, `Username`: account records.
//! - `ContactsService`, `AccountsService`: driving port implementations.
//! - `Error` / `ErrorCode`: transport-agnostic failure payload.

pub mod accounts_service;
pub mod auth;
pub mod contact;
pub mod contacts_service;
pub mod error;
pub mod ports;
pub mod tokens;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::{AccountsService, AccountsServiceDeps};
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration};
pub use self::contact::{
    BirthdayWindow, Contact, ContactChanges, ContactId, ContactValidationError,
    DEFAULT_BIRTHDAY_WINDOW_DAYS, MAX_BIRTHDAY_WINDOW_DAYS, NewContact,
};
pub use self::contacts_service::ContactsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::tokens::{ConfirmationToken, RefreshToken, RefreshTokenError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EmailAddress, NewUser, User, UserId, UserValidationError, Username};
