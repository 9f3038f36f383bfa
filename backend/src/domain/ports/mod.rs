//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, `PasswordHasher`, `AvatarStore`, ...) are
//! implemented by outbound adapters. Driving ports (`ContactsQuery`,
//! `AccountsCommand`, ...) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod avatar_store;
mod confirmation_notifier;
mod connectivity_probe;
mod contact_repository;
mod contacts_command;
mod contacts_query;
mod default_avatar;
mod password_hasher;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::{
    AccountsCommand, ConfirmationOutcome, EmailConfirmation, IssuedSession,
};
#[cfg(test)]
pub use avatar_store::MockAvatarStore;
pub use avatar_store::{AvatarStore, AvatarStoreError, AvatarUpload, UnconfiguredAvatarStore};
#[cfg(test)]
pub use confirmation_notifier::MockConfirmationNotifier;
pub use confirmation_notifier::{ConfirmationNotifier, ConfirmationNotifierError};
#[cfg(test)]
pub use connectivity_probe::MockConnectivityProbe;
pub use connectivity_probe::{ConnectivityError, ConnectivityProbe};
#[cfg(test)]
pub use contact_repository::MockContactRepository;
pub use contact_repository::{ContactRepository, ContactRepositoryError};
#[cfg(test)]
pub use contacts_command::MockContactsCommand;
pub use contacts_command::{
    ContactsCommand, CreateContactRequest, RemoveContactRequest, UpdateContactRequest,
};
#[cfg(test)]
pub use contacts_query::MockContactsQuery;
pub use contacts_query::ContactsQuery;
#[cfg(test)]
pub use default_avatar::MockDefaultAvatarProvider;
pub use default_avatar::{DefaultAvatarProvider, NoDefaultAvatar};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
